use std::time::Duration;

use axum::{http::StatusCode, Router};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::common;

/// Wait until the hub holds more than `baseline` waiters.
async fn wait_for_waiters(baseline: usize) {
    let hub = server::feed::global_hub();
    for _ in 0..200 {
        if hub.subscriber_count() > baseline {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("feed poll never parked");
}

/// Start a long-poll in the background and return once it is parked.
async fn park_poll(
    app: &Router,
    token: &str,
    scope: &str,
    since: u64,
) -> tokio::task::JoinHandle<(StatusCode, Value)> {
    let baseline = server::feed::global_hub().subscriber_count();
    let app = app.clone();
    let token = token.to_string();
    let uri = format!("/api/v1/complaints/feed?scope={scope}&since={since}");
    let handle = tokio::spawn(async move { common::get_with_auth(&app, &uri, &token).await });
    wait_for_waiters(baseline).await;
    handle
}

#[tokio::test]
async fn first_poll_returns_a_snapshot() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;
    common::post_json_with_auth(
        &app,
        "/api/v1/complaints",
        &common::complaint_body("hostel", "high"),
        &student,
    )
    .await;

    let (status, update) =
        common::get_with_auth(&app, "/api/v1/complaints/feed?scope=mine&since=0", &student).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(update["type"], "snapshot");
    assert_eq!(update["complaints"].as_array().unwrap().len(), 1);
    assert_eq!(
        update["revision"].as_u64(),
        Some(server::feed::global_hub().revision())
    );
}

#[tokio::test]
async fn parked_poll_wakes_on_submit() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    common::seed_user(&pool, "Dean", "dean@campus.edu", true).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;
    let admin = common::login(&app, "dean@campus.edu", "admin").await;

    let since = server::feed::global_hub().revision();
    let admin_feed = park_poll(&app, &admin, "all", since).await;

    let (status, _) = common::post_json_with_auth(
        &app,
        "/api/v1/complaints",
        &common::complaint_body("infrastructure", "critical"),
        &student,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, update) = admin_feed.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(update["type"], "snapshot");
    assert_eq!(update["revision"].as_u64(), Some(since + 1));
    assert_eq!(update["complaints"][0]["urgency"], "critical");
    assert_eq!(update["complaints"][0]["submitter"]["name"], "Asha");
}

#[tokio::test]
async fn mine_feed_skips_other_students() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    common::seed_user(&pool, "Ravi", "ravi@campus.edu", false).await;
    let asha = common::login(&app, "asha@campus.edu", "user").await;
    let ravi = common::login(&app, "ravi@campus.edu", "user").await;

    let since = server::feed::global_hub().revision();
    let ravi_feed = park_poll(&app, &ravi, "mine", since).await;

    common::post_json_with_auth(
        &app,
        "/api/v1/complaints",
        &common::complaint_body("canteen", "low"),
        &asha,
    )
    .await;

    let (status, update) = ravi_feed.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(update["type"], "snapshot");
    assert_eq!(update["complaints"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn students_cannot_watch_everything() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;

    let (status, _) =
        common::get_with_auth(&app, "/api/v1/complaints/feed?scope=all&since=0", &student).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn a_second_poll_supersedes_the_first() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;

    let since = server::feed::global_hub().revision();
    let first = park_poll(&app, &student, "mine", since).await;

    // The replacement swaps one waiter for another, so the count never rises.
    let second = {
        let app = app.clone();
        let token = student.clone();
        let uri = format!("/api/v1/complaints/feed?scope=mine&since={since}");
        tokio::spawn(async move { common::get_with_auth(&app, &uri, &token).await })
    };

    let (status, update) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(update["type"], "superseded");

    let (status, _) = common::post_json_with_auth(&app, "/api/v1/auth/logout", "", &student).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, update) = second.await.unwrap();
    assert_eq!(update["type"], "superseded");
}
