//! Authorization gate consulted by every mutation. Denials are returned as
//! errors, never applied as silent filters; callers must check before
//! touching persistence.

use uuid::Uuid;

use crate::features::users::models::UserRole;
use crate::utilities::{errors::AppError, jwt::Claims};

/// Owner-or-admin check for mutations on an owned resource.
pub fn owner_or_admin(owner_id: Uuid, claims: &Claims) -> Result<(), AppError> {
    if claims.sub == owner_id || claims.role == UserRole::Admin {
        return Ok(());
    }
    Err(AppError::Forbidden(
        "You do not have permission to modify this resource".to_string(),
    ))
}

/// Role gate for endpoints restricted to a subset of roles. Admins do not
/// bypass this one: a role gate describes who the endpoint is *for*, not
/// who owns the data.
pub fn require_role(claims: &Claims, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&claims.role) {
        return Ok(());
    }
    Err(AppError::Forbidden("Insufficient permissions".to_string()))
}

/// Read-visibility rule for non-published properties: only the owner or an
/// admin may see them. Everyone else gets NotFound upstream so existence
/// is not leaked.
pub fn can_view_unpublished(owner_id: Uuid, claims: Option<&Claims>) -> bool {
    match claims {
        Some(claims) => claims.sub == owner_id || claims.role == UserRole::Admin,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::jwt::TokenType;

    fn claims(sub: Uuid, role: UserRole) -> Claims {
        Claims {
            sub,
            role,
            typ: TokenType::Access,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn owner_may_mutate_own_resource() {
        let owner = Uuid::new_v4();
        assert!(owner_or_admin(owner, &claims(owner, UserRole::Landlord)).is_ok());
    }

    #[test]
    fn admin_overrides_ownership() {
        let owner = Uuid::new_v4();
        let admin = Uuid::new_v4();
        assert!(owner_or_admin(owner, &claims(admin, UserRole::Admin)).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        match owner_or_admin(owner, &claims(other, UserRole::Landlord)) {
            Err(AppError::Forbidden(_)) => {}
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    #[test]
    fn role_gate_rejects_admin_not_in_list() {
        let actor = claims(Uuid::new_v4(), UserRole::Admin);
        assert!(require_role(&actor, &[UserRole::Tenant]).is_err());
        assert!(require_role(&actor, &[UserRole::Tenant, UserRole::Admin]).is_ok());
    }

    #[test]
    fn unpublished_hidden_from_anonymous_and_strangers() {
        let owner = Uuid::new_v4();
        assert!(!can_view_unpublished(owner, None));
        let stranger = claims(Uuid::new_v4(), UserRole::Tenant);
        assert!(!can_view_unpublished(owner, Some(&stranger)));
        let owner_claims = claims(owner, UserRole::Landlord);
        assert!(can_view_unpublished(owner, Some(&owner_claims)));
        let admin = claims(Uuid::new_v4(), UserRole::Admin);
        assert!(can_view_unpublished(owner, Some(&admin)));
    }
}
