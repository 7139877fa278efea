use std::{marker::PhantomData, sync::Arc};

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    auth::{AdminRole, Principal, RequiredRole, SuperAdminRole, UserRole},
    error::AppError,
    state::AppState,
};

// Bearer token -> principal, cached per request.
impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>().cloned() {
            return Ok(principal);
        }

        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token =
            bearer_token(auth).ok_or_else(|| AppError::unauthorized("missing bearer token"))?;

        let claims = state
            .tokens
            .verify(token)
            .ok_or_else(|| AppError::unauthorized("invalid or expired token"))?;

        let principal = claims.principal();
        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}

/// Token after a case-insensitive `Bearer` scheme and any whitespace.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim_start().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

/// A principal of the kind `R` demands. A token of the other kind is
/// treated as no token at all; a plain admin on a superadmin route is 403.
pub struct AuthGuard<R: RequiredRole> {
    pub principal: Principal,
    _marker: PhantomData<R>,
}

pub type UserGuard = AuthGuard<UserRole>;
pub type AdminGuard = AuthGuard<AdminRole>;
pub type SuperAdminGuard = AuthGuard<SuperAdminRole>;

impl<R> FromRequestParts<Arc<AppState>> for AuthGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;

        if principal.kind != R::kind() {
            return Err(AppError::unauthorized("wrong token type"));
        }
        if R::superadmin_only() && !principal.is_superadmin() {
            return Err(AppError::forbidden("superadmin only"));
        }

        Ok(Self {
            principal,
            _marker: PhantomData,
        })
    }
}
