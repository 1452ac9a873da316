//! Complaint operations shared by server functions and REST handlers.
//!
//! Authorization is checked here, at the data boundary, so neither transport
//! can resolve a complaint on behalf of a non-admin.

use std::sync::Arc;

use shared_types::{
    AppError, ComplaintResponse, FeedScope, FeedUpdate, SubmitComplaintRequest,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::feed::{self, FeedFilter, FeedHub};
use crate::repo;

fn responses(rows: Vec<shared_types::Complaint>) -> Vec<ComplaintResponse> {
    rows.into_iter().map(ComplaintResponse::from).collect()
}

fn require_admin(claims: &Claims) -> Result<(), AppError> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden("Administrator access required"))
    }
}

/// File a complaint as the signed-in user and push the new list to every feed.
#[tracing::instrument(skip(pool, hub, claims, req), fields(user_id = claims.sub, category = %req.category))]
pub async fn submit(
    pool: &Pool<Postgres>,
    hub: &FeedHub,
    claims: &Claims,
    req: &SubmitComplaintRequest,
) -> Result<ComplaintResponse, AppError> {
    req.precheck()?;
    req.validate_request()?;

    let submitter = repo::user::find_profile(pool, claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("User data not found!"))?;

    let created = repo::complaint::create(pool, &submitter, req).await?;
    tracing::info!(complaint_id = %created.id, urgency = %created.urgency, "complaint submitted");

    feed::publish_latest(pool, hub).await;
    Ok(created.into())
}

/// Mark a pending complaint resolved. Administrators only.
#[tracing::instrument(skip(pool, hub, claims), fields(admin_id = claims.sub))]
pub async fn resolve(
    pool: &Pool<Postgres>,
    hub: &FeedHub,
    claims: &Claims,
    id: Uuid,
) -> Result<ComplaintResponse, AppError> {
    require_admin(claims)?;

    let resolved = repo::complaint::resolve(pool, id, claims.sub).await?;
    tracing::info!(complaint_id = %id, "complaint resolved");

    feed::publish_latest(pool, hub).await;
    Ok(resolved.into())
}

/// Every complaint with submitter details removed. No session needed.
pub async fn list_public(pool: &Pool<Postgres>) -> Result<Vec<ComplaintResponse>, AppError> {
    let rows = repo::complaint::list_unordered(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| ComplaintResponse::from(row).redacted())
        .collect())
}

/// The caller's own complaints, newest first.
pub async fn list_mine(
    pool: &Pool<Postgres>,
    claims: &Claims,
) -> Result<Vec<ComplaintResponse>, AppError> {
    Ok(responses(repo::complaint::list_by_user(pool, claims.sub).await?))
}

/// Every complaint, newest first. Administrators only.
pub async fn list_all(
    pool: &Pool<Postgres>,
    claims: &Claims,
) -> Result<Vec<ComplaintResponse>, AppError> {
    require_admin(claims)?;
    Ok(responses(repo::complaint::list_all(pool).await?))
}

/// One long-poll on the caller's `scope` feed.
#[tracing::instrument(skip(pool, hub, claims), fields(user_id = claims.sub, scope = scope.as_str()))]
pub async fn poll_feed(
    pool: &Pool<Postgres>,
    hub: &Arc<FeedHub>,
    claims: &Claims,
    scope: FeedScope,
    since: u64,
) -> Result<FeedUpdate, AppError> {
    let filter = FeedFilter::for_caller(scope, claims)?;
    let load = async {
        match filter {
            FeedFilter::Submitter(user_id) => repo::complaint::list_by_user(pool, user_id)
                .await
                .map(responses),
            FeedFilter::Everything => repo::complaint::list_all(pool).await.map(responses),
        }
    };
    feed::poll(
        hub,
        &claims.sid,
        scope,
        filter,
        since,
        crate::config::feed_poll_timeout(),
        load,
    )
    .await
}
