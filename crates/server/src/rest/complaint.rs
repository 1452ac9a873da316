use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared_types::{AppError, ComplaintResponse, FeedScope, FeedUpdate, SubmitComplaintRequest};
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::extractors::{AdminRequired, AuthRequired};
use crate::desk;
use crate::feed::FeedHub;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
pub struct FeedParams {
    /// `mine` or `all` (administrators only).
    pub scope: FeedScope,
    /// Last revision the client holds; 0 on the first poll.
    #[serde(default)]
    pub since: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Every complaint, without submitter details, in no particular order.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/public",
    responses(
        (status = 200, description = "All complaints, redacted", body = Vec<ComplaintResponse>),
        (status = 503, description = "Database unavailable", body = AppError)
    ),
    tag = "complaints"
)]
#[tracing::instrument(skip(pool))]
pub async fn list_public(
    State(pool): State<Pool<Postgres>>,
) -> Result<Json<Vec<ComplaintResponse>>, AppError> {
    Ok(Json(desk::list_public(&pool).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = SubmitComplaintRequest,
    responses(
        (status = 201, description = "Complaint filed", body = ComplaintResponse),
        (status = 400, description = "Unknown category or empty field", body = AppError),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "complaints",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, hub, auth, payload))]
pub async fn submit(
    State(pool): State<Pool<Postgres>>,
    State(hub): State<Arc<FeedHub>>,
    auth: AuthRequired,
    Json(payload): Json<SubmitComplaintRequest>,
) -> Result<(StatusCode, Json<ComplaintResponse>), AppError> {
    let created = desk::submit(&pool, &hub, &auth.0, &payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// The caller's complaints, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/mine",
    responses(
        (status = 200, description = "Own complaints", body = Vec<ComplaintResponse>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "complaints",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn list_mine(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<Vec<ComplaintResponse>>, AppError> {
    Ok(Json(desk::list_mine(&pool, &auth.0).await?))
}

/// Every complaint, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    responses(
        (status = 200, description = "All complaints", body = Vec<ComplaintResponse>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Administrator access required", body = AppError)
    ),
    tag = "complaints",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, admin))]
pub async fn list_all(
    State(pool): State<Pool<Postgres>>,
    admin: AdminRequired,
) -> Result<Json<Vec<ComplaintResponse>>, AppError> {
    Ok(Json(desk::list_all(&pool, &admin.0).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/complaints/{id}/resolve",
    params(("id" = Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint resolved", body = ComplaintResponse),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Administrator access required", body = AppError),
        (status = 404, description = "Complaint not found", body = AppError),
        (status = 409, description = "Complaint already resolved", body = AppError)
    ),
    tag = "complaints",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, hub, auth))]
pub async fn resolve(
    State(pool): State<Pool<Postgres>>,
    State(hub): State<Arc<FeedHub>>,
    auth: AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplaintResponse>, AppError> {
    Ok(Json(desk::resolve(&pool, &hub, &auth.0, id).await?))
}

/// Long-poll a live feed. Answers at once when `since` is stale.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/feed",
    params(FeedParams),
    responses(
        (status = 200, description = "Snapshot, unchanged or superseded", body = FeedUpdate),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "The all feed is for administrators", body = AppError)
    ),
    tag = "complaints",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, hub, auth))]
pub async fn feed(
    State(pool): State<Pool<Postgres>>,
    State(hub): State<Arc<FeedHub>>,
    auth: AuthRequired,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedUpdate>, AppError> {
    let update = desk::poll_feed(&pool, &hub, &auth.0, params.scope, params.since).await?;
    Ok(Json(update))
}
