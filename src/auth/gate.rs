use super::{Principal, PrincipalKind};
use crate::{db::entities::user, error::AppError};

pub fn require_superadmin(principal: &Principal) -> Result<(), AppError> {
    if principal.is_superadmin() {
        return Ok(());
    }
    Err(AppError::forbidden("superadmin only"))
}

/// A superadmin may touch any user; an admin only the users it created.
/// Legacy rows without an owner are therefore superadmin-only.
pub fn check_ownership(principal: &Principal, target: &user::Model) -> Result<(), AppError> {
    if principal.kind != PrincipalKind::Admin {
        return Err(AppError::forbidden("admin only"));
    }
    if principal.is_superadmin() {
        return Ok(());
    }
    match target.created_by_admin_id.as_deref() {
        Some(owner) if owner == principal.id => Ok(()),
        _ => Err(AppError::forbidden("not your user")),
    }
}

/// Owner filter for user listings; `None` means every row.
pub fn listing_scope(principal: &Principal) -> Option<&str> {
    if principal.is_superadmin() {
        None
    } else {
        Some(principal.id.as_str())
    }
}
