// Server-only auth helpers for server functions.
// These are shared across all api/* modules.

use dioxus::prelude::*;
use shared_types::AppError;

use crate::auth::{cookies, jwt};
use crate::error_convert::AppErrorExt;

/// The caller's validated claims, if any.
/// Checks middleware-injected Claims first, falls back to cookie parsing.
pub(crate) fn current_claims() -> Option<jwt::Claims> {
    let ctx = dioxus::fullstack::FullstackContext::current()?;
    let parts = ctx.parts_mut();

    // Primary: Claims already validated by auth middleware
    if let Some(claims) = parts.extensions.get::<jwt::Claims>() {
        return Some(claims.clone());
    }

    // Fallback: parse access token from cookies/Bearer header
    let token = cookies::extract_access_token(&parts.headers)?;
    jwt::validate_access_token(&token).ok()
}

/// Require an active session. Returns the validated Claims or
/// "Please login first!".
pub(crate) fn require_auth() -> Result<jwt::Claims, ServerFnError> {
    current_claims().ok_or_else(|| AppError::unauthorized("Please login first!").into_server_fn_error())
}

/// Require the caller to be an administrator.
pub(crate) fn require_admin() -> Result<jwt::Claims, ServerFnError> {
    let claims = require_auth()?;
    if !claims.is_admin() {
        return Err(AppError::forbidden("Administrator access required").into_server_fn_error());
    }
    Ok(claims)
}
