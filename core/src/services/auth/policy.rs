//! Static authorization policy
//!
//! Four independent primitives, consulted per route by the API layer:
//! exact role membership, hierarchy-level comparison, permission-set
//! checks, and resource ownership. All failures are `AuthError`s that the
//! boundary maps to 403; a missing/invalid token never reaches these
//! functions (that is the middleware's 401).

use uuid::Uuid;

use crate::domain::entities::user::UserRole;
use crate::errors::{AuthError, DomainResult};

/// Lowest role treated as "elevated" for ownership checks
pub const ELEVATED_ROLE: UserRole = UserRole::Manager;

/// Require that the role is one of the allowed set
pub fn require_role(role: UserRole, allowed: &[UserRole]) -> DomainResult<()> {
    if allowed.contains(&role) {
        return Ok(());
    }
    Err(AuthError::InsufficientRole {
        required: allowed
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
    .into())
}

/// Require that the role sits at or above `min` in the hierarchy
pub fn require_min_role(role: UserRole, min: UserRole) -> DomainResult<()> {
    if role.level() >= min.level() {
        return Ok(());
    }
    Err(AuthError::InsufficientRole {
        required: format!("{} or above", min.as_str()),
    }
    .into())
}

/// Require every listed permission (wildcard `*` grants all)
pub fn require_permission(role: UserRole, permissions: &[&str]) -> DomainResult<()> {
    for permission in permissions {
        if !role.has_permission(permission) {
            return Err(AuthError::MissingPermission {
                permission: (*permission).to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Allow the resource owner, or any caller holding an elevated role
pub fn require_owner_or_admin(
    caller_id: Uuid,
    caller_role: UserRole,
    owner_id: Uuid,
) -> DomainResult<()> {
    if caller_id == owner_id || caller_role.level() >= ELEVATED_ROLE.level() {
        return Ok(());
    }
    Err(AuthError::NotResourceOwner.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    #[test]
    fn test_require_role_exact_membership() {
        assert!(require_role(UserRole::Trainer, &[UserRole::Trainer, UserRole::Manager]).is_ok());

        // Hierarchy does not apply to exact membership: an admin is not a trainer
        let err = require_role(UserRole::Admin, &[UserRole::Trainer]).unwrap_err();
        match err {
            DomainError::Auth(AuthError::InsufficientRole { required }) => {
                assert!(required.contains("trainer"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_require_min_role() {
        assert!(require_min_role(UserRole::Manager, UserRole::Trainer).is_ok());
        assert!(require_min_role(UserRole::Trainer, UserRole::Trainer).is_ok());
        assert!(require_min_role(UserRole::Member, UserRole::Trainer).is_err());
        assert!(require_min_role(UserRole::Admin, UserRole::Manager).is_ok());
    }

    #[test]
    fn test_require_permission_all_must_hold() {
        assert!(require_permission(UserRole::Trainer, &["schedule:manage"]).is_ok());
        assert!(
            require_permission(UserRole::Trainer, &["schedule:manage", "reports:view"]).is_err()
        );
        assert!(require_permission(UserRole::Manager, &["reports:view", "member:manage"]).is_ok());
    }

    #[test]
    fn test_wildcard_grants_everything() {
        assert!(require_permission(UserRole::Admin, &["anything:at-all"]).is_ok());
    }

    #[test]
    fn test_permission_failure_names_permission() {
        let err = require_permission(UserRole::Member, &["equipment:update"]).unwrap_err();
        match err {
            DomainError::Auth(AuthError::MissingPermission { permission }) => {
                assert_eq!(permission, "equipment:update");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_owner_or_admin() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        // The owner passes regardless of role
        assert!(require_owner_or_admin(owner, UserRole::Member, owner).is_ok());
        // Elevated roles pass for any resource
        assert!(require_owner_or_admin(stranger, UserRole::Manager, owner).is_ok());
        assert!(require_owner_or_admin(stranger, UserRole::Admin, owner).is_ok());
        // Everyone else is denied
        assert!(require_owner_or_admin(stranger, UserRole::Member, owner).is_err());
        assert!(require_owner_or_admin(stranger, UserRole::Trainer, owner).is_err());
    }
}
