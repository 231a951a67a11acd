//! Profile routes

use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};
use profilehub_db::{Account, Profile};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{JsonBody, PathParam};
use crate::state::AppState;

use super::auth::{RequireAdmin, RequireAuth};
use super::types::{MessageResponse, PrivacyRequest, ProfileEntry};

/// GET /profile/{user_id}
async fn get_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
) -> Result<Json<Profile>, ApiError> {
    let account = state
        .db
        .get_account_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    user.authorize_profile_read(account.id, account.profile.is_public)?;

    Ok(Json(account.profile))
}

/// PUT /profile/{user_id}
///
/// Replaces the whole profile; omitted fields are cleared.
async fn update_profile(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
    JsonBody(profile): JsonBody<Profile>,
) -> Result<Json<Account>, ApiError> {
    user.authorize_profile_write(user_id)
        .map_err(|_| ApiError::Forbidden("You are not authorized to edit this profile".to_string()))?;

    debug!("Updating profile {} by {}", user_id, user.username);

    let account = state
        .db
        .replace_profile(user_id, &profile)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!("Updated profile for account {}", account.id);
    Ok(Json(account))
}

/// GET /profiles
async fn list_public_profiles(
    _user: RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileEntry>>, ApiError> {
    let accounts = state.db.list_public_accounts().await?;
    Ok(Json(accounts.into_iter().map(ProfileEntry::from).collect()))
}

/// GET /admin/profiles (Admin only)
async fn list_all_profiles(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Account>>, ApiError> {
    let accounts = state.db.list_accounts().await?;
    Ok(Json(accounts))
}

/// PUT /profile/privacy
async fn set_privacy(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<PrivacyRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let updated = state
        .db
        .set_profile_visibility(user.id, request.is_public)
        .await?;

    if !updated {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(
        "User {} set profile visibility to {}",
        user.username,
        if request.is_public { "public" } else { "private" }
    );

    Ok(Json(MessageResponse::new(
        "Profile privacy updated successfully",
    )))
}

/// Create profile routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(list_public_profiles))
        .route("/admin/profiles", get(list_all_profiles))
        .route("/profile/privacy", put(set_privacy))
        .route("/profile/{user_id}", get(get_profile).put(update_profile))
}
