//! Request/Response DTOs for the account API

use profilehub_db::{Account, Profile};
use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
}

/// Plain acknowledgement
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ==================== Profile Types ====================

/// Privacy toggle request
#[derive(Deserialize)]
pub struct PrivacyRequest {
    #[serde(alias = "isPublic")]
    pub is_public: bool,
}

/// Entry in the public profile listing
#[derive(Serialize)]
pub struct ProfileEntry {
    pub id: i64,
    pub username: String,
    pub profile: Profile,
}

impl From<Account> for ProfileEntry {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            profile: account.profile,
        }
    }
}
