use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::{Pool, Postgres};

use super::cookies::{self, CookieSlot, PendingCookieAction};
use super::jwt::{self, hash_token, validate_access_token, validate_refresh_token};
use crate::repo;

/// Permissive auth middleware that handles authentication and cookie management.
///
/// On each request:
/// 1. Validates the access token from cookies (or Bearer header fallback)
/// 2. If missing or expired, attempts transparent refresh using the refresh cookie
/// 3. Inserts a `CookieSlot` so server functions can schedule cookie changes
/// 4. After the handler runs, applies any pending cookie actions to the response
///
/// Does NOT reject unauthenticated requests. Handlers decide authorization.
pub async fn auth_middleware(
    State(pool): State<Pool<Postgres>>,
    mut req: Request,
    next: Next,
) -> Response {
    let headers = req.headers().clone();
    let mut refresh_cookies: Option<(String, String)> = None;

    let access_token = cookies::extract_access_token(&headers);
    let mut needs_refresh = access_token.is_none();

    if let Some(token) = access_token {
        match validate_access_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(_) => needs_refresh = true,
        }
    }

    if needs_refresh {
        if let Some(refresh_token) = cookies::extract_refresh_token(&headers) {
            refresh_cookies = try_transparent_refresh(&pool, &refresh_token, &mut req).await;
        }
    }

    let cookie_slot = CookieSlot::default();
    req.extensions_mut().insert(cookie_slot.clone());

    let mut response = next.run(req).await;

    if let Some((access, refresh)) = refresh_cookies {
        cookies::set_auth_cookies(response.headers_mut(), &access, &refresh);
    }

    // A scheduled action wins over the refresh cookies set above.
    match cookie_slot.take() {
        Some(PendingCookieAction::Set {
            access_token,
            refresh_token,
        }) => cookies::set_auth_cookies(response.headers_mut(), &access_token, &refresh_token),
        Some(PendingCookieAction::Clear) => cookies::clear_auth_cookies(response.headers_mut()),
        None => {}
    }

    response
}

/// Rotate the refresh token and insert fresh claims into the request.
/// The session id and role carry over, so logout still ends the rotated session.
async fn try_transparent_refresh(
    pool: &Pool<Postgres>,
    refresh_token: &str,
    req: &mut Request,
) -> Option<(String, String)> {
    let claims = validate_refresh_token(refresh_token).ok()?;

    let consumed = repo::session::consume_refresh_token(pool, claims.sub, &hash_token(refresh_token))
        .await
        .ok()?;
    if !consumed {
        tracing::debug!(user_id = claims.sub, "refresh token revoked or unknown");
        return None;
    }

    let new_access =
        jwt::create_access_token(claims.sub, &claims.email, &claims.role, &claims.sid).ok()?;
    let (new_refresh, expires_at) =
        jwt::create_refresh_token(claims.sub, &claims.email, &claims.role, &claims.sid).ok()?;

    if let Err(e) = repo::session::store_refresh_token(
        pool,
        claims.sub,
        &claims.sid,
        &hash_token(&new_refresh),
        expires_at,
    )
    .await
    {
        tracing::warn!(error = %e, "could not store rotated refresh token");
        return None;
    }

    let new_claims = validate_access_token(&new_access).ok()?;
    req.extensions_mut().insert(new_claims);

    Some((new_access, new_refresh))
}
