use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use shared_types::dashboard::{
    render, CardAudience, CategoryFilter, DashboardCounters, DashboardFilters, StatusFilter,
};
use shared_types::{ComplaintResponse, ComplaintStatus};

use crate::common;

async fn admin_list(app: &axum::Router, token: &str) -> Vec<ComplaintResponse> {
    let (status, body) = common::get_with_auth(app, "/api/v1/complaints", token).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_value(body).expect("complaint list")
}

#[tokio::test]
async fn one_of_three_resolved_is_a_third() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    common::seed_user(&pool, "Dean", "dean@campus.edu", true).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;
    let admin = common::login(&app, "dean@campus.edu", "admin").await;

    let mut ids = Vec::new();
    for (category, urgency) in [("hostel", "low"), ("canteen", "high"), ("library", "critical")] {
        let (_, created) = common::post_json_with_auth(
            &app,
            "/api/v1/complaints",
            &common::complaint_body(category, urgency),
            &student,
        )
        .await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }
    let uri = format!("/api/v1/complaints/{}/resolve", ids[0]);
    let (status, _) = common::post_json_with_auth(&app, &uri, "", &admin).await;
    assert_eq!(status, StatusCode::OK);

    let list = admin_list(&app, &admin).await;
    let view = render(&list, &DashboardFilters::default(), CardAudience::Admin);
    assert_eq!(
        view.counters,
        DashboardCounters {
            total: 3,
            resolved: 1,
            pending: 2,
            resolution_rate: 33,
        }
    );
    assert_eq!(view.cards.iter().filter(|c| c.can_resolve).count(), 2);
    assert_eq!(
        view.cards.iter().filter(|c| c.high_urgency).count(),
        2,
        "high and critical are both flagged"
    );
}

#[tokio::test]
async fn filters_narrow_cards_but_not_counters() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    common::seed_user(&pool, "Dean", "dean@campus.edu", true).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;
    let admin = common::login(&app, "dean@campus.edu", "admin").await;

    for category in ["hostel", "hostel", "it_services"] {
        common::post_json_with_auth(
            &app,
            "/api/v1/complaints",
            &common::complaint_body(category, "medium"),
            &student,
        )
        .await;
    }

    let list = admin_list(&app, &admin).await;
    let filters = DashboardFilters {
        status: StatusFilter::Only(ComplaintStatus::Pending),
        category: CategoryFilter::Only("it_services".into()),
    };
    let view = render(&list, &filters, CardAudience::Admin);

    assert_eq!(view.counters.total, 3);
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].category_label, "IT Services");

    let resolved_only = DashboardFilters {
        status: StatusFilter::Only(ComplaintStatus::Resolved),
        ..DashboardFilters::default()
    };
    let empty = render(&list, &resolved_only, CardAudience::Admin);
    assert!(empty.cards.is_empty());
    assert_eq!(empty.placeholder.as_deref(), Some("No complaints found."));
}

#[tokio::test]
async fn public_board_never_names_submitters() {
    let (app, pool, _guard) = common::test_app().await;
    common::seed_user(&pool, "Asha", "asha@campus.edu", false).await;
    let student = common::login(&app, "asha@campus.edu", "user").await;
    common::post_json_with_auth(
        &app,
        "/api/v1/complaints",
        &common::complaint_body("academic", "low"),
        &student,
    )
    .await;

    let (_, body) = common::get(&app, "/api/v1/complaints/public").await;
    let list: Vec<ComplaintResponse> = serde_json::from_value(body).unwrap();
    let view = render(&list, &DashboardFilters::default(), CardAudience::Public);

    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].submitter, None);
    assert!(!view.cards[0].can_resolve);
}
