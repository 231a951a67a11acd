//! Authenticated caller identity

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::jwt::Claims;

/// Authenticated user information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

impl AuthUser {
    /// Create from JWT claims
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthError> {
        let id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            id,
            username: claims.username.clone(),
            is_admin: claims.is_admin,
        })
    }
}

/// Extract the token from an `Authorization` header value
///
/// The header carries the raw token; a `Bearer ` prefix is tolerated.
pub fn extract_token(header: &str) -> Result<&str, AuthError> {
    let header = header.trim();
    let token = match header.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => header,
    };
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_raw_and_bearer_tokens() {
        assert_eq!(extract_token("abc.def.ghi").unwrap(), "abc.def.ghi");
        assert_eq!(extract_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert_eq!(extract_token("  abc.def.ghi ").unwrap(), "abc.def.ghi");
        assert!(matches!(extract_token(""), Err(AuthError::InvalidAuthHeader)));
        assert!(matches!(extract_token("Bearer "), Err(AuthError::InvalidAuthHeader)));
        assert!(matches!(extract_token("Bearer"), Err(AuthError::InvalidAuthHeader)));
        assert_eq!(extract_token("Bearer   abc.def.ghi").unwrap(), "abc.def.ghi");
        assert_eq!(extract_token("Bearerabc").unwrap(), "Bearerabc");
    }

    #[test]
    fn test_from_claims() {
        let claims = Claims {
            sub: "42".to_string(),
            username: "alice".to_string(),
            is_admin: true,
            exp: 0,
            iat: 0,
        };
        let user = AuthUser::from_claims(&claims).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.username, "alice");
        assert!(user.is_admin);

        let bad = Claims {
            sub: "not-a-number".to_string(),
            ..claims
        };
        assert!(matches!(AuthUser::from_claims(&bad), Err(AuthError::InvalidToken)));
    }
}
