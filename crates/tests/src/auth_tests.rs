use axum::{body::Body, http::{Request, StatusCode}};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common;

#[tokio::test]
async fn register_creates_a_regular_user_without_signing_in() {
    let (app, _pool, _guard) = common::test_app().await;

    let body = common::register_body("Asha", "Asha@Campus.edu");
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/register")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, headers, profile) = common::send_raw(&app, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(profile["email"], "asha@campus.edu");
    assert_eq!(profile["is_admin"], false);
    assert!(common::set_cookies(&headers).is_empty());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;

    let body = common::register_body("Other", "asha@campus.edu");
    let (status, response) =
        common::post_json(&app, "/api/v1/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["message"], "Email already registered!");
}

#[tokio::test]
async fn mismatched_passwords_are_rejected_before_storage() {
    let (app, pool, _guard) = common::test_app().await;

    let mut body = common::register_body("Asha", "asha@campus.edu");
    body["confirm_password"] = json!("different");
    let (status, response) =
        common::post_json(&app, "/api/v1/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["message"], "Passwords do not match!");
    assert_eq!(response["field_errors"]["confirm_password"], "Passwords do not match!");
    assert_eq!(server::repo::user::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;

    let body = json!({ "email": "asha@campus.edu", "password": "nope-nope", "surface": "user" });
    let (status, response) =
        common::post_json(&app, "/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Invalid email or password!");
}

#[tokio::test]
async fn user_login_sets_cookies_and_returns_the_profile() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;

    let body = json!({ "email": "asha@campus.edu", "password": common::PASSWORD, "surface": "user" });
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, headers, response) = common::send_raw(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["user"]["name"], "Asha");
    let cookies = common::set_cookies(&headers);
    assert!(cookies.iter().any(|c| c.starts_with("desk_access=") && c.contains("HttpOnly")));
    assert!(cookies.iter().any(|c| c.starts_with("desk_refresh=")));
}

#[tokio::test]
async fn admin_surface_refuses_regular_accounts_and_clears_cookies() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;

    let body = json!({ "email": "asha@campus.edu", "password": common::PASSWORD, "surface": "admin" });
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, headers, response) = common::send_raw(&app, req).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["kind"], "RoleMismatch");
    assert_eq!(response["message"], "Not an admin account!");
    assert!(response.get("access_token").is_none());

    let cookies = common::set_cookies(&headers);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn user_surface_refuses_admin_accounts() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Dean", "dean@campus.edu", true).await;

    let body = json!({ "email": "dean@campus.edu", "password": common::PASSWORD, "surface": "user" });
    let (status, response) =
        common::post_json(&app, "/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Please use admin login");
}

#[tokio::test]
async fn account_without_user_record_is_not_found() {
    let (app, pool, _guard) = common::test_app().await;
    let hash = server::auth::password::hash_password(common::PASSWORD).unwrap();
    server::repo::user::create_account(&pool, "ghost@campus.edu", &hash)
        .await
        .unwrap();

    let body = json!({ "email": "ghost@campus.edu", "password": common::PASSWORD, "surface": "admin" });
    let (status, response) =
        common::post_json(&app, "/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["message"], "Admin data not found!");
}

#[tokio::test]
async fn refused_login_ends_the_prior_session() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    let token = common::login(&app, "asha@campus.edu", "user").await;

    let live: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE revoked = FALSE")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(live, 1);

    let body = json!({ "email": "asha@campus.edu", "password": common::PASSWORD, "surface": "admin" });
    let (status, _) = common::post_json_with_auth(
        &app,
        "/api/v1/auth/login",
        &body.to_string(),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let live: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM refresh_tokens WHERE revoked = FALSE")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(live, 0);
}

#[tokio::test]
async fn me_and_logout_follow_the_session() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;

    let (status, _) = common::get(&app, "/api/v1/auth/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = common::login(&app, "asha@campus.edu", "user").await;
    let (status, me) = common::get_with_auth(&app, "/api/v1/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["student_id"], "S-asha");

    let (status, _) =
        common::post_json_with_auth(&app, "/api/v1/auth/logout", "", &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
