//! Profile access rules

use crate::error::AuthError;
use crate::identity::AuthUser;

/// Whether a requester may read a target profile
///
/// Public profiles are readable by anyone authenticated; private ones only
/// by their owner or an admin.
pub fn can_view_profile(
    requester_id: i64,
    requester_is_admin: bool,
    target_id: i64,
    target_is_public: bool,
) -> bool {
    target_is_public || requester_is_admin || requester_id == target_id
}

/// Whether a requester may rewrite a target profile (owner or admin)
pub fn can_edit_profile(requester_id: i64, requester_is_admin: bool, target_id: i64) -> bool {
    requester_is_admin || requester_id == target_id
}

impl AuthUser {
    /// Check read access to a profile
    pub fn authorize_profile_read(
        &self,
        target_id: i64,
        target_is_public: bool,
    ) -> Result<(), AuthError> {
        if can_view_profile(self.id, self.is_admin, target_id, target_is_public) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }

    /// Check write access to a profile
    pub fn authorize_profile_write(&self, target_id: i64) -> Result<(), AuthError> {
        if can_edit_profile(self.id, self.is_admin, target_id) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_decision_over_full_space() {
        const REQUESTER: i64 = 1;
        for is_public in [false, true] {
            for is_admin in [false, true] {
                for is_owner in [false, true] {
                    let target = if is_owner { REQUESTER } else { 2 };
                    let expected = is_public || is_admin || is_owner;
                    assert_eq!(
                        can_view_profile(REQUESTER, is_admin, target, is_public),
                        expected,
                        "public={is_public} admin={is_admin} owner={is_owner}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_edit_decision() {
        assert!(can_edit_profile(1, false, 1));
        assert!(can_edit_profile(1, true, 2));
        assert!(!can_edit_profile(1, false, 2));
    }

    #[test]
    fn test_authorize_helpers() {
        let user = AuthUser {
            id: 5,
            username: "bob".to_string(),
            is_admin: false,
        };
        assert!(user.authorize_profile_read(6, true).is_ok());
        assert!(user.authorize_profile_read(5, false).is_ok());
        assert!(matches!(
            user.authorize_profile_read(6, false),
            Err(AuthError::InsufficientPermissions)
        ));
        assert!(user.authorize_profile_write(5).is_ok());
        assert!(user.authorize_profile_write(6).is_err());
    }
}
