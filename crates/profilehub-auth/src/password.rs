//! Password hashing with Argon2id

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Salted one-way password hashing
#[derive(Clone)]
pub struct PasswordManager {
    argon2: Argon2<'static>,
}

impl PasswordManager {
    /// Create a password manager with the given cost parameters
    pub fn new(params: HashParams) -> Result<Self, AuthError> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Verify a password against a stored PHC string
    ///
    /// A mismatch is `Ok(false)`; only an unparseable hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswordHash(e.to_string())),
        }
    }
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_manager() -> PasswordManager {
        PasswordManager::new(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let manager = fast_manager();

        let hash = manager.hash("correct horse").unwrap();
        assert_ne!(hash, "correct horse");
        assert!(hash.starts_with("$argon2id$"));

        assert!(manager.verify("correct horse", &hash).unwrap());
        assert!(!manager.verify("battery staple", &hash).unwrap());
        assert!(!manager.verify("", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let manager = fast_manager();

        let first = manager.hash("same password").unwrap();
        let second = manager.hash("same password").unwrap();
        assert_ne!(first, second);
        assert!(manager.verify("same password", &first).unwrap());
        assert!(manager.verify("same password", &second).unwrap());
    }

    #[test]
    fn test_verify_uses_params_from_hash() {
        let hash = fast_manager().hash("pw").unwrap();
        assert!(PasswordManager::default().verify("pw", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let manager = fast_manager();
        assert!(matches!(
            manager.verify("pw", "not-a-phc-string"),
            Err(AuthError::PasswordHash(_))
        ));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordManager::new(HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }
}
