use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn submitting_requires_a_session() {
    let (app, _pool, _guard) = common::test_app().await;

    let (status, response) = common::post_json(
        &app,
        "/api/v1/complaints",
        &common::complaint_body("hostel", "low"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Please login first!");
}

#[tokio::test]
async fn critical_complaint_reaches_every_board() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    common::seed_user(&pool, "Dean", "dean@campus.edu", true).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;
    let admin = common::login(&app, "dean@campus.edu", "admin").await;

    let (status, created) = common::post_json_with_auth(
        &app,
        "/api/v1/complaints",
        &common::complaint_body("infrastructure", "critical"),
        &student,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["urgency"], "critical");
    assert_eq!(created["submitter"]["name"], "Asha");

    let (status, mine) = common::get_with_auth(&app, "/api/v1/complaints/mine", &student).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, all) = common::get_with_auth(&app, "/api/v1/complaints", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all[0]["id"], created["id"]);
    assert_eq!(all[0]["submitter"]["student_id"], "S-asha");

    let (status, public) = common::get(&app, "/api/v1/complaints/public").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public[0]["id"], created["id"]);
    assert!(public[0].get("submitter").is_none());
}

#[tokio::test]
async fn unknown_category_is_rejected() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;

    let (status, response) = common::post_json_with_auth(
        &app,
        "/api/v1/complaints",
        &common::complaint_body("parking", "low"),
        &student,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["field_errors"]["category"], "Please choose a category");
}

#[tokio::test]
async fn students_see_only_their_own_complaints() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    common::seed_user(&pool, "Ravi", "ravi@campus.edu", false).await;
    let asha = common::login(&app, "asha@campus.edu", "user").await;
    let ravi = common::login(&app, "ravi@campus.edu", "user").await;

    for category in ["hostel", "canteen"] {
        common::post_json_with_auth(&app, "/api/v1/complaints", &common::complaint_body(category, "low"), &asha).await;
    }
    common::post_json_with_auth(&app, "/api/v1/complaints", &common::complaint_body("library", "high"), &ravi).await;

    let (_, mine) = common::get_with_auth(&app, "/api/v1/complaints/mine", &ravi).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["category"], "library");

    let (status, _) = common::get_with_auth(&app, "/api/v1/complaints", &ravi).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_admins_resolve_and_only_once() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    common::seed_user(&pool, "Dean", "dean@campus.edu", true).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;
    let admin = common::login(&app, "dean@campus.edu", "admin").await;

    let (_, created) = common::post_json_with_auth(
        &app,
        "/api/v1/complaints",
        &common::complaint_body("transport", "medium"),
        &student,
    )
    .await;
    let uri = format!("/api/v1/complaints/{}/resolve", created["id"].as_str().unwrap());

    let (status, _) = common::post_json_with_auth(&app, &uri, "", &student).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, resolved) = common::post_json_with_auth(&app, &uri, "", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "resolved");
    assert!(resolved["resolved_at"].is_string());

    let (status, _) = common::post_json_with_auth(&app, &uri, "", &admin).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn resolving_a_missing_complaint_is_not_found() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Dean", "dean@campus.edu", true).await;
    let admin = common::login(&app, "dean@campus.edu", "admin").await;

    let uri = format!("/api/v1/complaints/{}/resolve", uuid::Uuid::new_v4());
    let (status, _) = common::post_json_with_auth(&app, &uri, "", &admin).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_count_is_admin_only() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    common::seed_user(&pool, "Ravi", "ravi@campus.edu", false).await;
    common::seed_user(&pool, "Dean", "dean@campus.edu", true).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;
    let admin = common::login(&app, "dean@campus.edu", "admin").await;

    let (status, _) = common::get_with_auth(&app, "/api/v1/users/count", &student).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, count) = common::get_with_auth(&app, "/api/v1/users/count", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["total"], 3);
}
