//! Account API routes
//!
//! Registration, session handling and profile management.

pub mod auth;
pub mod profiles;
pub mod types;

use axum::Router;

use crate::state::AppState;

pub use auth::{RequireAdmin, RequireAuth};

/// Create account API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(profiles::routes())
}
