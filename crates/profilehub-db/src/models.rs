//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

fn default_is_public() -> bool {
    true
}

/// Profile sub-document of an account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Photo URL
    #[serde(default)]
    pub photo: Option<String>,
    /// Visibility flag; profiles are public unless explicitly hidden
    #[serde(default = "default_is_public", alias = "isPublic")]
    pub is_public: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: None,
            bio: None,
            phone: None,
            photo: None,
            is_public: default_is_public(),
        }
    }
}

/// Account model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile: Profile,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New account (for insertion)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for Profile {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            name: row.try_get("profile_name")?,
            bio: row.try_get("profile_bio")?,
            phone: row.try_get("profile_phone")?,
            photo: row.try_get("profile_photo")?,
            is_public: row.try_get("profile_is_public")?,
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Account {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            profile: Profile::try_from(row)?,
            is_admin: row.try_get("is_admin")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
            updated_at: parse_datetime_or_now(&row.try_get::<String, _>("updated_at")?),
        })
    }
}
