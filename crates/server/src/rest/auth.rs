use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use shared_types::{AppError, AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::auth::cookies::{CookieSlot, PendingCookieAction};
use crate::auth::extractors::{AuthRequired, MaybeAuth};
use crate::auth::session;
use crate::feed::FeedHub;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered; not signed in", body = UserProfile),
        (status = 400, description = "Passwords do not match", body = AppError),
        (status = 403, description = "Registration disabled", body = AppError),
        (status = 409, description = "Email already registered", body = AppError),
        (status = 422, description = "Validation error", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, payload))]
pub async fn register(
    State(pool): State<Pool<Postgres>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let profile = session::register(&pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AppError),
        (status = 403, description = "Account does not match the login form", body = AppError),
        (status = 404, description = "No user record for the account", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, hub, slot, prior, payload))]
pub async fn login(
    State(pool): State<Pool<Postgres>>,
    State(hub): State<Arc<FeedHub>>,
    Extension(slot): Extension<CookieSlot>,
    MaybeAuth(prior): MaybeAuth,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    match session::login(&pool, &hub, &payload, prior.as_ref()).await {
        Ok(issued) => {
            slot.schedule(PendingCookieAction::Set {
                access_token: issued.access_token.clone(),
                refresh_token: issued.refresh_token,
            });
            Ok(Json(AuthResponse {
                user: issued.profile,
                access_token: issued.access_token,
            }))
        }
        Err(err) => {
            if session::terminates_session(&err) {
                slot.schedule(PendingCookieAction::Clear);
            }
            Err(err)
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 500, description = "Internal server error", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, hub, slot, auth))]
pub async fn logout(
    State(pool): State<Pool<Postgres>>,
    State(hub): State<Arc<FeedHub>>,
    Extension(slot): Extension<CookieSlot>,
    auth: AuthRequired,
) -> Result<StatusCode, AppError> {
    session::end_session(&pool, &hub, &auth.0.sid).await?;
    slot.schedule(PendingCookieAction::Clear);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Signed-in user", body = UserProfile),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 404, description = "User record no longer exists", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn me(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<UserProfile>, AppError> {
    session::current_profile(&pool, &auth.0)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User data not found!"))
}
