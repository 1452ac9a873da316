use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware,
    Router,
};
use serde_json::{json, Value};
use shared_types::{RegisterRequest, UserProfile};
use sqlx::{Pool, Postgres};
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const PASSWORD: &str = "secret99";

/// Global mutex ensuring tests run sequentially against the shared database.
/// Each test acquires this lock before truncating, preventing concurrent
/// tests from interfering with each other's data.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

/// Build a test router backed by a real Postgres pool.
/// Acquires a global lock and truncates all tables.
/// The returned `MutexGuard` must be held for the duration of the test.
pub async fn test_app() -> (Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>) {
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();

    let database_url = std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("TEST_DATABASE_URL or DATABASE_URL must be set for tests");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE complaints, refresh_tokens, users, accounts RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to truncate");

    let state = server::db::AppState::new(pool.clone());
    // The permissive auth middleware puts claims in place for the extractors;
    // anonymous requests still pass through.
    let router = server::rest::api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            server::auth::middleware::auth_middleware,
        ))
        .with_state(state);

    (router, pool, guard)
}

pub fn register_body(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "student_id": format!("S-{}", name.to_lowercase()),
        "email": email,
        "department": "Computer Science",
        "password": PASSWORD,
        "confirm_password": PASSWORD,
    })
}

/// Insert an account and user record directly, bypassing the registration flag.
pub async fn seed_user(pool: &Pool<Postgres>, name: &str, email: &str, is_admin: bool) -> UserProfile {
    let request: RegisterRequest =
        serde_json::from_value(register_body(name, email)).expect("valid register body");
    let hash = server::auth::password::hash_password(PASSWORD).expect("hash password");
    server::repo::user::register(pool, &request, &hash, is_admin)
        .await
        .expect("Failed to seed user")
}

/// Log in over REST and return the access token.
pub async fn login(app: &Router, email: &str, surface: &str) -> String {
    let body = json!({ "email": email, "password": PASSWORD, "surface": surface });
    let (status, response) = post_json(app, "/api/v1/auth/login", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK, "login failed: {response}");
    response["access_token"]
        .as_str()
        .expect("access token in login response")
        .to_string()
}

pub fn complaint_body(category: &str, urgency: &str) -> String {
    json!({
        "category": category,
        "location": "Library, 2nd floor",
        "description": "Air conditioning is not working",
        "urgency": urgency,
    })
    .to_string()
}

/// POST JSON without credentials.
pub async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

/// POST JSON with a JWT Bearer token.
pub async fn post_json_with_auth(
    app: &Router,
    uri: &str,
    body: &str,
    token: &str,
) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

/// GET without credentials.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, req).await
}

/// GET with a JWT Bearer token.
pub async fn get_with_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    send(app, req).await
}

/// Send a request through the router and parse the response.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, _headers, body) = send_raw(app, req).await;
    (status, body)
}

/// Like [`send`], but also returns the response headers.
pub async fn send_raw(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&body_bytes).to_string(),
        ))
    };

    (status, headers, body)
}

/// Every Set-Cookie value on a response.
pub fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}
