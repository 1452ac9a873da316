use axum::Router;
use shared_types::{
    AppError, AppErrorKind, AuthResponse, ComplaintResponse, ComplaintStatus, FeedScope,
    FeedUpdate, LoginRequest, LoginSurface, RegisterRequest, SubmitComplaintRequest, Submitter,
    Urgency, UserCount, UserProfile,
};
use sqlx::{Pool, Postgres};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health;
use crate::rest;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        rest::auth::register,
        rest::auth::login,
        rest::auth::logout,
        rest::auth::me,
        rest::complaint::list_public,
        rest::complaint::submit,
        rest::complaint::list_mine,
        rest::complaint::list_all,
        rest::complaint::resolve,
        rest::complaint::feed,
        rest::user::count_users,
        health::health_check,
    ),
    components(schemas(
        AppError,
        AppErrorKind,
        AuthResponse,
        ComplaintResponse,
        ComplaintStatus,
        FeedScope,
        FeedUpdate,
        LoginRequest,
        LoginSurface,
        RegisterRequest,
        SubmitComplaintRequest,
        Submitter,
        Urgency,
        UserCount,
        UserProfile,
        health::HealthResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and logout"),
        (name = "complaints", description = "Filing, listing, resolving and live feeds"),
        (name = "users", description = "User records"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Campus Complaint Desk API",
        description = "Students file facility complaints; administrators resolve them.",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build an Axum router that serves the API docs at `/docs`, the raw
/// document at `/api-docs/openapi.json` and the REST API at `/api/*`.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .route(
            "/api-docs/openapi.json",
            axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
        )
        .with_state(AppState::new(pool))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
