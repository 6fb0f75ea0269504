use chrono::Utc;
use tracing::debug;

use crate::errors::internal::AccessError;
use crate::errors::InternalError;
use crate::types::db::{system_access, user};
use crate::types::internal::{PermissionGrants, PermissionLevel, ResourceCategory, Role};

/// Answers "may this user perform this level on this category right now".
///
/// Fail-closed: every path that cannot positively prove permission denies.
/// A malformed grants blob, a missing access record and a suspended account
/// all produce the same `false` as an explicit denial.
pub struct Authorizer;

impl Authorizer {
    /// Pure decision over already-loaded rows. Callers load the user and (for
    /// system users) the access record; no queries happen here.
    pub fn is_authorized(
        user: &user::Model,
        access: Option<&system_access::Model>,
        category: ResourceCategory,
        level: PermissionLevel,
    ) -> bool {
        Self::is_authorized_at(user, access, category, level, Utc::now().timestamp())
    }

    pub fn is_authorized_at(
        user: &user::Model,
        access: Option<&system_access::Model>,
        category: ResourceCategory,
        level: PermissionLevel,
        now: i64,
    ) -> bool {
        if user.is_suspended() {
            return false;
        }

        // Admin tiers bypass per-category gating entirely
        if user.role.is_administrative() {
            return true;
        }

        if user.role != Role::SystemUser {
            return false;
        }

        let Some(access) = access else {
            return false;
        };
        if access.user_id != user.id {
            return false;
        }
        if access.suspended_at.is_some() {
            return false;
        }
        if let Some(expires_at) = access.expires_at {
            if expires_at < now {
                return false;
            }
        }

        match PermissionGrants::from_json(&access.grants) {
            Ok(grants) => grants.contains(category, level),
            Err(e) => {
                debug!(access_id = %access.id, error = %e, "Malformed grants blob, denying");
                false
            }
        }
    }

    /// Actors never operate on their own account or access record.
    pub fn ensure_not_self(actor_id: &str, target_id: &str) -> Result<(), InternalError> {
        if actor_id == target_id {
            return Err(InternalError::Access(AccessError::SelfTargetForbidden));
        }
        Ok(())
    }

    /// Role-tier guard for administrative mutations on another user.
    pub fn ensure_outranks(actor: &user::Model, target: &user::Model) -> Result<(), InternalError> {
        if !actor.role.outranks(target.role) {
            return Err(InternalError::Access(AccessError::InsufficientRank {
                actor_role: actor.role.as_str().to_owned(),
                target_role: target.role.as_str().to_owned(),
            }));
        }
        Ok(())
    }

    pub fn ensure_target_not_suspended(target: &user::Model) -> Result<(), InternalError> {
        if target.is_suspended() {
            return Err(InternalError::Access(AccessError::TargetSuspended {
                user_id: target.id.clone(),
            }));
        }
        Ok(())
    }

    /// Grant rows only attach to approved system-user accounts.
    pub fn ensure_grant_eligible(target: &user::Model) -> Result<(), InternalError> {
        if target.role != Role::SystemUser || !target.is_approved() {
            return Err(InternalError::Access(AccessError::TargetNotEligible {
                user_id: target.id.clone(),
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(role: Role) -> user::Model {
        user::Model {
            id: "u-1".to_string(),
            email: "u@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            name: "Test".to_string(),
            phone: None,
            avatar_url: None,
            verified_at: Some(100),
            approved_at: Some(100),
            suspended_at: None,
            created_at: 100,
            updated_at: 100,
        }
    }

    fn test_access(grants: &PermissionGrants) -> system_access::Model {
        system_access::Model {
            id: "a-1".to_string(),
            user_id: "u-1".to_string(),
            assigner_id: "admin-1".to_string(),
            grants: grants.to_json().unwrap(),
            suspended_at: None,
            expires_at: None,
            created_at: 100,
            updated_at: 100,
        }
    }

    fn view_artists() -> PermissionGrants {
        PermissionGrants::from_pairs([(ResourceCategory::Artists, vec![PermissionLevel::View])])
    }

    const NOW: i64 = 1_000_000;

    #[test]
    fn test_admin_tiers_bypass_grants() {
        for role in [Role::SystemAdmin, Role::SystemOwner] {
            let user = test_user(role);
            assert!(Authorizer::is_authorized_at(
                &user,
                None,
                ResourceCategory::Revenue,
                PermissionLevel::Delete,
                NOW,
            ));
        }
    }

    #[test]
    fn test_plain_user_always_denied() {
        let user = test_user(Role::User);
        let access = test_access(&view_artists());
        assert!(!Authorizer::is_authorized_at(
            &user,
            Some(&access),
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));
    }

    #[test]
    fn test_system_user_needs_exact_grant() {
        let user = test_user(Role::SystemUser);
        let access = test_access(&view_artists());

        assert!(Authorizer::is_authorized_at(
            &user,
            Some(&access),
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));
        // Higher levels are not implied by lower ones
        assert!(!Authorizer::is_authorized_at(
            &user,
            Some(&access),
            ResourceCategory::Artists,
            PermissionLevel::Delete,
            NOW,
        ));
        // Other categories stay denied
        assert!(!Authorizer::is_authorized_at(
            &user,
            Some(&access),
            ResourceCategory::Releases,
            PermissionLevel::View,
            NOW,
        ));
    }

    #[test]
    fn test_missing_access_record_denies() {
        let user = test_user(Role::SystemUser);
        assert!(!Authorizer::is_authorized_at(
            &user,
            None,
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));
    }

    #[test]
    fn test_suspended_user_denied_even_as_owner() {
        let mut user = test_user(Role::SystemOwner);
        user.suspended_at = Some(NOW - 10);
        assert!(!Authorizer::is_authorized_at(
            &user,
            None,
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));
    }

    #[test]
    fn test_suspended_or_expired_access_denies() {
        let user = test_user(Role::SystemUser);

        let mut suspended = test_access(&view_artists());
        suspended.suspended_at = Some(NOW - 10);
        assert!(!Authorizer::is_authorized_at(
            &user,
            Some(&suspended),
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));

        let mut expired = test_access(&view_artists());
        expired.expires_at = Some(NOW - 1);
        assert!(!Authorizer::is_authorized_at(
            &user,
            Some(&expired),
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));

        // Boundary: expiry exactly now is still valid
        let mut at_boundary = test_access(&view_artists());
        at_boundary.expires_at = Some(NOW);
        assert!(Authorizer::is_authorized_at(
            &user,
            Some(&at_boundary),
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));
    }

    #[test]
    fn test_malformed_grants_blob_denies() {
        let user = test_user(Role::SystemUser);
        let mut access = test_access(&view_artists());
        access.grants = "{broken".to_string();
        assert!(!Authorizer::is_authorized_at(
            &user,
            Some(&access),
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));
    }

    #[test]
    fn test_mismatched_access_row_denies() {
        let user = test_user(Role::SystemUser);
        let mut access = test_access(&view_artists());
        access.user_id = "someone-else".to_string();
        assert!(!Authorizer::is_authorized_at(
            &user,
            Some(&access),
            ResourceCategory::Artists,
            PermissionLevel::View,
            NOW,
        ));
    }

    #[test]
    fn test_self_and_rank_guards() {
        assert!(Authorizer::ensure_not_self("u-1", "u-2").is_ok());
        assert!(matches!(
            Authorizer::ensure_not_self("u-1", "u-1"),
            Err(InternalError::Access(AccessError::SelfTargetForbidden))
        ));

        let admin = test_user(Role::SystemAdmin);
        let mut peer = test_user(Role::SystemAdmin);
        peer.id = "u-2".to_string();
        assert!(matches!(
            Authorizer::ensure_outranks(&admin, &peer),
            Err(InternalError::Access(AccessError::InsufficientRank { .. }))
        ));

        let mut staff = test_user(Role::SystemUser);
        staff.id = "u-3".to_string();
        assert!(Authorizer::ensure_outranks(&admin, &staff).is_ok());
    }

    #[test]
    fn test_grant_eligibility() {
        let staff = test_user(Role::SystemUser);
        assert!(Authorizer::ensure_grant_eligible(&staff).is_ok());

        let mut unapproved = test_user(Role::SystemUser);
        unapproved.approved_at = None;
        assert!(Authorizer::ensure_grant_eligible(&unapproved).is_err());

        let plain = test_user(Role::User);
        assert!(Authorizer::ensure_grant_eligible(&plain).is_err());
    }
}
