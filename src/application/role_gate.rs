// src/application/role_gate.rs
//
// Membership test between an actor's role and the roles an operation
// allows. Role strings are normalized once, at the enum boundary, so the
// comparison here is plain equality.
use crate::application::dto::AuthenticatedUser;
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::role::RoleName;

pub fn ensure_role(actor: &AuthenticatedUser, allowed: &[RoleName]) -> ApplicationResult<()> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "role '{}' may not perform this operation",
            actor.role
        )))
    }
}

pub fn is_admin(actor: &AuthenticatedUser) -> bool {
    actor.role == RoleName::Admin
}

pub fn is_cha(actor: &AuthenticatedUser) -> bool {
    actor.role == RoleName::Cha
}

/// Roles allowed to manage sales entities (leads, quotations, orders).
pub const BACK_OFFICE_ROLES: [RoleName; 2] = [RoleName::Admin, RoleName::BackOffice];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserId;

    fn actor(role: RoleName) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId(1),
            name: "Test".into(),
            email: "test@example.com".into(),
            role,
        }
    }

    #[test]
    fn membership_grants_access() {
        assert!(ensure_role(&actor(RoleName::Admin), &BACK_OFFICE_ROLES).is_ok());
        assert!(ensure_role(&actor(RoleName::BackOffice), &BACK_OFFICE_ROLES).is_ok());
    }

    #[test]
    fn denial_is_forbidden() {
        let err = ensure_role(&actor(RoleName::Customer), &[RoleName::Admin]).unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden(_)));
    }
}
