//! ProfileHub Authentication and Authorization
//!
//! This crate provides password hashing, JWT session tokens and the
//! profile access rules for ProfileHub.

pub mod access;
pub mod error;
pub mod identity;
pub mod jwt;
pub mod password;

pub use access::{can_edit_profile, can_view_profile};
pub use error::AuthError;
pub use identity::{AuthUser, extract_token};
pub use jwt::{Claims, JwtManager};
pub use password::{HashParams, PasswordManager};
