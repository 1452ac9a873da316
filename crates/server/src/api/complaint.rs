use dioxus::prelude::*;
use shared_types::{ComplaintResponse, FeedScope, FeedUpdate, SubmitComplaintRequest, UserCount};
use uuid::Uuid;

#[cfg(feature = "server")]
use crate::db::get_db;

#[cfg(feature = "server")]
use crate::desk;

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::{require_admin, require_auth};

/// File a complaint as the signed-in user.
#[cfg_attr(feature = "server", tracing::instrument(skip(request)))]
#[server]
pub async fn submit_complaint(
    request: SubmitComplaintRequest,
) -> Result<ComplaintResponse, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    desk::submit(db, &crate::feed::global_hub(), &claims, &request)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Mark a complaint resolved. Administrators only.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn resolve_complaint(id: Uuid) -> Result<ComplaintResponse, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    desk::resolve(db, &crate::feed::global_hub(), &claims, id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Every complaint without submitter details. No session needed.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_public_complaints() -> Result<Vec<ComplaintResponse>, ServerFnError> {
    let db = get_db().await;
    desk::list_public(db)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Long-poll the caller's `scope` feed. `since` is the last revision the
/// client holds, 0 before the first snapshot.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn poll_complaint_feed(scope: FeedScope, since: u64) -> Result<FeedUpdate, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    desk::poll_feed(db, &crate::feed::global_hub(), &claims, scope, since)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Number of registered user records. Administrators only.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn count_users() -> Result<UserCount, ServerFnError> {
    require_admin()?;
    let db = get_db().await;
    let total = crate::repo::user::count(db)
        .await
        .map_err(|e| e.into_server_fn_error())?;
    Ok(UserCount { total })
}
