pub mod auth;
pub mod complaint;
pub mod user;

use axum::{routing::{get, post}, Router};
use crate::db::AppState;

/// Build the REST API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        // Complaints
        .route("/api/v1/complaints", get(complaint::list_all).post(complaint::submit))
        .route("/api/v1/complaints/public", get(complaint::list_public))
        .route("/api/v1/complaints/mine", get(complaint::list_mine))
        .route("/api/v1/complaints/feed", get(complaint::feed))
        .route("/api/v1/complaints/{id}/resolve", post(complaint::resolve))
        // Users
        .route("/api/v1/users/count", get(user::count_users))
}
