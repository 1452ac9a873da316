use axum::{extract::State, Json};
use shared_types::{AppError, UserCount};
use sqlx::{Pool, Postgres};

use crate::auth::extractors::AdminRequired;
use crate::repo;

#[utoipa::path(
    get,
    path = "/api/v1/users/count",
    responses(
        (status = 200, description = "Number of registered users", body = UserCount),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Administrator access required", body = AppError)
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, _admin))]
pub async fn count_users(
    State(pool): State<Pool<Postgres>>,
    _admin: AdminRequired,
) -> Result<Json<UserCount>, AppError> {
    let total = repo::user::count(&pool).await?;
    Ok(Json(UserCount { total }))
}
