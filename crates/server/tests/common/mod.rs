use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware, Router,
};
use server::db::AppState;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::OnceLock;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret99";

/// Tables to truncate before the first test (child tables before parents).
const ALL_TABLES: &str = "complaints, refresh_tokens, users, accounts";

/// One-time flag to ensure we only set up the test database once per process.
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Set up the test database and override DATABASE_URL so all subsequent pool
/// creation uses the `_test` database instead of the main one.
async fn ensure_test_db() {
    let _ = dotenvy::dotenv();
    let original_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let (base_url, db_name) = original_url
        .rsplit_once('/')
        .expect("DATABASE_URL must contain a database name");
    let test_db_name = format!("{}_test", db_name);
    let test_url = format!("{}/{}", base_url, test_db_name);

    let admin_url = format!("{}/postgres", base_url);
    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url)
        .await
        .expect("Failed to connect to postgres admin database");

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&test_db_name)
            .fetch_one(&admin_pool)
            .await
            .expect("Failed to check for test database");

    if !exists {
        sqlx::query(&format!("CREATE DATABASE \"{}\"", test_db_name))
            .execute(&admin_pool)
            .await
            .expect("Failed to create test database");
    }

    admin_pool.close().await;

    unsafe { std::env::set_var("DATABASE_URL", &test_url) };
}

/// Pool on the test database. The first call migrates and truncates.
async fn test_pool() -> Pool<Postgres> {
    if INITIALIZED.get().is_none() {
        ensure_test_db().await;
    }

    let pool = server::db::create_pool();

    if INITIALIZED.set(()).is_ok() {
        server::db::run_migrations(&pool).await;

        sqlx::query(&format!("TRUNCATE {} RESTART IDENTITY CASCADE", ALL_TABLES))
            .execute(&pool)
            .await
            .expect("Failed to truncate test tables");
    }

    pool
}

/// The router `main` serves minus the Dioxus pages: REST routes, health,
/// the OpenAPI document and docs, wrapped in the cookie auth middleware.
pub async fn test_app() -> Router {
    let pool = test_pool().await;
    let state = AppState::new(pool.clone());

    server::openapi::api_router(pool).layer(middleware::from_fn_with_state(
        state,
        server::auth::middleware::auth_middleware,
    ))
}

/// An email no other test in this process will use.
#[allow(dead_code)]
pub fn unique_email(prefix: &str) -> String {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}_{ts}@campus.test")
}

/// Register a student over REST and return the response status.
#[allow(dead_code)]
pub async fn register_student(app: &Router, name: &str, email: &str) -> StatusCode {
    let body = serde_json::json!({
        "name": name,
        "student_id": format!("S-{}", email.len()),
        "email": email,
        "department": "Physics",
        "password": PASSWORD,
        "confirm_password": PASSWORD,
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await.0
}

/// Send a request and return (status, headers, body text).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.clone().oneshot(req).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

/// GET without credentials.
#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

/// Request carrying a raw `Cookie` header.
#[allow(dead_code)]
pub async fn with_cookies(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: &str,
) -> (StatusCode, HeaderMap, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// The `name=value` pair of a Set-Cookie header for `name`, if present.
#[allow(dead_code)]
pub fn cookie_pair(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}
