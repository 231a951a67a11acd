//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use profilehub_auth::AuthError;
use profilehub_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            ApiError::Database(e) => match e {
                DbError::DuplicateEmail(_) => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_EMAIL",
                    "Email already exists".to_string(),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    e.to_string(),
                ),
            },
            ApiError::Auth(e) => match e {
                AuthError::InsufficientPermissions => (
                    StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "You are not authorized to view this profile".to_string(),
                ),
                AuthError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "Invalid credentials".to_string(),
                ),
                AuthError::PasswordHash(_)
                | AuthError::Jwt(_)
                | AuthError::InvalidTokenLifetime(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal error".to_string(),
                ),
                _ => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", e.to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = axum::Json(json!({
            "code": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}
