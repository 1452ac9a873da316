use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::AppError;

use super::jwt::Claims;

/// Extractor that requires authentication. Returns 401 if no valid token.
pub struct AuthRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Please login first!"))
    }
}

/// Extractor that optionally extracts auth claims. Never fails.
pub struct MaybeAuth(pub Option<Claims>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<Claims>().cloned()))
    }
}

/// Extractor for administrator-only endpoints.
/// 401 without a session, 403 for a regular user.
pub struct AdminRequired(pub Claims);

impl<S: Send + Sync> FromRequestParts<S> for AdminRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthRequired(claims) = AuthRequired::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(AppError::forbidden("Administrator access required"));
        }
        Ok(AdminRequired(claims))
    }
}
