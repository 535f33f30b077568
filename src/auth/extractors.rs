use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::error::AppError;

/// Request gate: pulls the bearer token out of the Authorization header,
/// verifies it, and hands the handler the caller's user ID. Protected
/// handlers take an `AuthUser` argument; everything else stays public.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthenticated("No token provided"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthenticated("No token provided"))?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid bearer token");
            AppError::Unauthenticated("Invalid token")
        })?;

        Ok(AuthUser(claims.sub))
    }
}
