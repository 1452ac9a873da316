use dioxus::prelude::*;
use shared_types::{LoginSurface, RegisterRequest, UserProfile};

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::{current_claims, require_auth};

/// Create a regular user account. The new account is not signed in.
#[cfg_attr(feature = "server", tracing::instrument(skip(request)))]
#[server]
pub async fn register(request: RegisterRequest) -> Result<UserProfile, ServerFnError> {
    let db = get_db().await;
    crate::auth::session::register(db, &request)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Sign in on the user or admin form. Sets HTTP-only auth cookies on success.
///
/// When the account has no user record, or its role does not match `surface`,
/// the session is ended and the auth cookies are cleared.
#[cfg_attr(feature = "server", tracing::instrument(skip(password)))]
#[server]
pub async fn login(
    email: String,
    password: String,
    surface: LoginSurface,
) -> Result<UserProfile, ServerFnError> {
    use crate::auth::{cookies, session};
    use shared_types::LoginRequest;

    let req = LoginRequest {
        email,
        password,
        surface,
    };
    let db = get_db().await;
    let hub = crate::feed::global_hub();
    let prior = current_claims();

    match session::login(db, &hub, &req, prior.as_ref()).await {
        Ok(issued) => {
            cookies::schedule_auth_cookies(&issued.access_token, &issued.refresh_token);
            Ok(issued.profile)
        }
        Err(err) => {
            if session::terminates_session(&err) {
                cookies::schedule_clear_cookies();
            }
            Err(err.into_server_fn_error())
        }
    }
}

/// End the session: revoke its refresh tokens, cancel its feeds, clear cookies.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn logout() -> Result<(), ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    let hub = crate::feed::global_hub();

    crate::auth::session::end_session(db, &hub, &claims.sid)
        .await
        .map_err(|e| e.into_server_fn_error())?;
    crate::auth::cookies::schedule_clear_cookies();
    Ok(())
}

/// The signed-in user, or `None` without a valid session.
///
/// Token refresh already happened in the auth middleware. A token whose user
/// record is gone clears the cookies so the client does not stay half signed in.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_current_user() -> Result<Option<UserProfile>, ServerFnError> {
    let Some(claims) = current_claims() else {
        return Ok(None);
    };

    let db = get_db().await;
    let profile = crate::auth::session::current_profile(db, &claims)
        .await
        .map_err(|e| e.into_server_fn_error())?;
    if profile.is_none() {
        crate::auth::cookies::schedule_clear_cookies();
    }
    Ok(profile)
}
