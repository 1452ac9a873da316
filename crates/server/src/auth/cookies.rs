use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{Cookie, CookieBuilder};
use std::sync::{Arc, Mutex};

use super::jwt;

pub const DESK_ACCESS: &str = "desk_access";
pub const DESK_REFRESH: &str = "desk_refresh";

fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

fn cookie_domain() -> Option<String> {
    std::env::var("COOKIE_DOMAIN").ok().filter(|d| !d.is_empty())
}

fn base_cookie<'a>(name: &'a str, value: &'a str) -> CookieBuilder<'a> {
    let mut cookie = Cookie::build((name, value))
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .secure(cookie_secure());
    if let Some(domain) = cookie_domain() {
        cookie = cookie.domain(domain);
    }
    cookie
}

fn to_header(cookie: Cookie<'_>) -> Option<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Set-Cookie value for the access token.
pub fn build_access_cookie(token: &str, max_age_minutes: i64) -> Option<HeaderValue> {
    to_header(
        base_cookie(DESK_ACCESS, token)
            .max_age(cookie::time::Duration::seconds(max_age_minutes * 60))
            .build(),
    )
}

/// Set-Cookie value for the refresh token.
pub fn build_refresh_cookie(token: &str, max_age_days: i64) -> Option<HeaderValue> {
    to_header(
        base_cookie(DESK_REFRESH, token)
            .max_age(cookie::time::Duration::seconds(max_age_days * 86400))
            .build(),
    )
}

/// Set-Cookie values that expire both auth cookies.
pub fn build_clear_cookies() -> Vec<HeaderValue> {
    [DESK_ACCESS, DESK_REFRESH]
        .into_iter()
        .filter_map(|name| {
            to_header(
                base_cookie(name, "")
                    .max_age(cookie::time::Duration::ZERO)
                    .build(),
            )
        })
        .collect()
}

/// Access token from the cookie, or from a Bearer header for REST clients.
pub fn extract_access_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, DESK_ACCESS) {
        return Some(token);
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

pub fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    extract_cookie(headers, DESK_REFRESH)
}

fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|piece| Cookie::parse(piece.trim().to_string()).ok())
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

/// Append both auth cookies using the configured token lifetimes.
pub fn set_auth_cookies(headers: &mut HeaderMap, access_token: &str, refresh_token: &str) {
    let cookies = [
        build_access_cookie(access_token, jwt::access_token_expiry_minutes()),
        build_refresh_cookie(refresh_token, jwt::refresh_token_expiry_days()),
    ];
    for value in cookies.into_iter().flatten() {
        headers.append(header::SET_COOKIE, value);
    }
}

pub fn clear_auth_cookies(headers: &mut HeaderMap) {
    for value in build_clear_cookies() {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Cookie change requested by a server function, applied by the auth middleware.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingCookieAction {
    Set {
        access_token: String,
        refresh_token: String,
    },
    Clear,
}

/// Slot inserted into request extensions so server functions can schedule
/// cookie changes on a response they never see.
#[derive(Clone, Debug, Default)]
pub struct CookieSlot(pub Arc<Mutex<Option<PendingCookieAction>>>);

impl CookieSlot {
    pub fn schedule(&self, action: PendingCookieAction) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(action);
        }
    }

    pub fn take(&self) -> Option<PendingCookieAction> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

fn schedule(action: PendingCookieAction) {
    if let Some(ctx) = dioxus::fullstack::FullstackContext::current() {
        let parts = ctx.parts_mut();
        if let Some(slot) = parts.extensions.get::<CookieSlot>() {
            slot.schedule(action);
        }
    }
}

/// Schedule auth cookies from inside a server function.
pub fn schedule_auth_cookies(access_token: &str, refresh_token: &str) {
    schedule(PendingCookieAction::Set {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
    });
}

/// Schedule both auth cookies to be cleared from inside a server function.
pub fn schedule_clear_cookies() {
    schedule(PendingCookieAction::Clear);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_is_a_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(extract_access_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; desk_access=xyz"));
        assert_eq!(extract_access_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn refresh_cookie_is_read_by_name() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("desk_refresh=r1; desk_access=a1"));
        assert_eq!(extract_refresh_token(&headers).as_deref(), Some("r1"));
    }

    #[test]
    fn clearing_expires_both_cookies() {
        let mut headers = HeaderMap::new();
        clear_auth_cookies(&mut headers);
        let values: Vec<String> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.contains("Max-Age=0")));
        assert!(values.iter().any(|v| v.starts_with("desk_access=")));
        assert!(values.iter().any(|v| v.starts_with("desk_refresh=")));
    }

    #[test]
    fn cookie_slot_hands_over_once() {
        let slot = CookieSlot::default();
        slot.schedule(PendingCookieAction::Clear);
        assert_eq!(slot.take(), Some(PendingCookieAction::Clear));
        assert_eq!(slot.take(), None);
    }
}
