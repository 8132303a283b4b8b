//! Integration tests for the statistics reporter.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_stats_counts_members_and_connections() {
    let app = helpers::TestApp::spawn().await;
    let _a = app.subscriber(1, "im").await;
    let _b = app.subscriber(1, "im").await;
    let _c = app.subscriber(2, "im").await;
    let _d = app.subscriber(-1, "match").await;
    let _e = app.subscriber(-1, "match").await;

    let response = app.stats("/stats").await;
    assert_eq!(response.status, StatusCode::OK);

    let apps = response.body["apps"].as_array().unwrap();
    assert_eq!(apps.len(), 2);
    assert_eq!(apps[0]["app"], "im");
    assert_eq!(apps[0]["kind"], "private");
    assert_eq!(apps[0]["count"], 2);
    assert_eq!(apps[1]["app"], "match");
    assert_eq!(apps[1]["kind"], "public");
    assert_eq!(apps[1]["count"], 2);

    let metrics = &response.body["metrics"];
    assert_eq!(metrics["connections_active"], 5);
    assert_eq!(metrics["subscriptions_total"], 5);
}

#[tokio::test]
async fn test_stats_track_auth_outcomes() {
    let app = helpers::TestApp::spawn().await;
    let _stranger = app.connect_as(-1, "").await;
    let _member = app.connect_as(9, "t").await;
    let _rejected = app.connect_as(12345, "t").await;

    let response = app.stats("/stats").await;
    let metrics = &response.body["metrics"];
    assert_eq!(metrics["auth_anonymous"], 1);
    assert_eq!(metrics["auth_members"], 1);
    assert_eq!(metrics["auth_rejected"], 1);
}

#[tokio::test]
async fn test_stats_apps_endpoint() {
    let app = helpers::TestApp::spawn().await;
    let _client = app.subscriber(-1, "news").await;

    let response = app.stats("/stats/apps").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body[0]["app"], "news");
    assert_eq!(response.body[0]["count"], 1);
}

#[tokio::test]
async fn test_stats_health() {
    let app = helpers::TestApp::spawn().await;
    let _client = app.connect_as(-1, "").await;

    let response = app.stats("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["connections_active"], 1);
}
