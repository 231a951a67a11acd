//! Authentication extractors and routes

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{
        StatusCode,
        header::{AUTHORIZATION, SET_COOKIE},
        request::Parts,
    },
    response::{AppendHeaders, IntoResponse},
    routing::post,
};
use profilehub_auth::{AuthError, AuthUser, extract_token};
use profilehub_db::{Account, NewAccount};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

/// Cookie cleared on logout
const SESSION_COOKIE: &str = "session";

// ==================== Auth Extractors ====================

/// Extractor for authenticated user (required)
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingAuthHeader)?;

        let token = extract_token(auth_header)?;
        let claims = app_state.jwt.validate_token(token)?;
        let user = AuthUser::from_claims(&claims)?;

        debug!("Authenticated user: {} (admin: {})", user.username, user.is_admin);
        Ok(RequireAuth(user))
    }
}

/// Extractor for admin user (required)
pub struct RequireAdmin(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(ApiError::Forbidden(
                "Forbidden, admin access required".to_string(),
            ));
        }

        Ok(RequireAdmin(user))
    }
}

// ==================== Input Validation ====================

/// Maximum allowed username length
const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;
/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;

/// Validate username presence and length
fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    if username.chars().any(char::is_control) {
        return Err(ApiError::BadRequest(
            "Username cannot contain control characters".to_string(),
        ));
    }
    Ok(())
}

/// Validate email shape and length
fn validate_email(email: &str) -> Result<(), ApiError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email cannot be empty".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Email exceeds maximum length of {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::BadRequest("Email address is invalid".to_string())),
    }
}

/// Validate password length
fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// ==================== Auth Routes ====================

/// POST /register
async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    validate_username(&request.username)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    debug!("Registering user: {}", request.username);

    let password_hash = state.passwords.hash(&request.password)?;

    let account = state
        .db
        .insert_account(NewAccount {
            username: request.username,
            email: request.email,
            password_hash,
        })
        .await?;

    metrics::counter!("profilehub_registrations_total").increment(1);
    info!("Registered account {} ({})", account.id, account.username);

    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Validate input lengths to prevent DoS
    if request.email.len() > MAX_EMAIL_LENGTH || request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(AuthError::InvalidCredentials.into());
    }

    debug!("Login attempt for: {}", request.email);

    // Don't return early on a missing account; the hash check runs either way
    let account = state.db.get_account_by_email(&request.email).await?;

    let hash_to_verify = match &account {
        Some(a) => a.password_hash.as_str(),
        None => &*state.dummy_hash,
    };

    let password_valid = state.passwords.verify(&request.password, hash_to_verify)?;

    let account = match (account, password_valid) {
        (Some(a), true) => a,
        _ => {
            metrics::counter!("profilehub_logins_total", "outcome" => "failure").increment(1);
            warn!("Failed login attempt for: {}", request.email);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let token = state
        .jwt
        .generate_token(account.id, &account.username, account.is_admin)?;

    metrics::counter!("profilehub_logins_total", "outcome" => "success").increment(1);
    info!("User {} logged in successfully", account.username);

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt.token_lifetime_secs(),
    }))
}

/// POST /logout
///
/// Tokens are stateless, so this only clears the session cookie.
async fn logout(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    info!("User {} logged out", user.username);

    (
        AppendHeaders([(
            SET_COOKIE,
            format!("{SESSION_COOKIE}=; Path=/; Max-Age=0; HttpOnly"),
        )]),
        Json(MessageResponse::new("Logged out")),
    )
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}
