//! Integration tests for the WebSocket protocol and push fan-out.

mod helpers;

use std::time::Duration;

use axum::http::StatusCode;
use gateway_core::types::MemberId;

#[tokio::test]
async fn test_anonymous_subscribe_public() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect().await;

    client.send(r#"{"member_id":-1,"token":""}"#).await;
    assert_eq!(client.recv().await, r#"{"code":200,"message":"hello stranger"}"#);

    assert_eq!(
        client.subscribe("match").await,
        r#"{"code":200,"message":"subscribe match success"}"#
    );
    assert_eq!(app.engine.registry.public_connections("match").len(), 1);
}

#[tokio::test]
async fn test_member_subscribe_private() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect().await;

    client.send(r#"{"member_id":123456,"token":"t"}"#).await;
    assert_eq!(client.recv().await, r#"{"code":200,"message":"hello 123456"}"#);

    assert_eq!(
        client.subscribe("im").await,
        r#"{"code":200,"message":"subscribe im success"}"#
    );
    assert_eq!(
        app.engine
            .registry
            .private_connections(MemberId(123456))
            .len(),
        1
    );
}

#[tokio::test]
async fn test_rejected_member_is_demoted() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect().await;

    client.send(r#"{"member_id":12345,"token":"t"}"#).await;
    assert_eq!(client.recv().await, r#"{"code":401,"message":"unauthorized"}"#);

    assert_eq!(
        client.subscribe("im").await,
        r#"{"code":403,"message":"subscribe im forbidden"}"#
    );
    assert!(
        app.engine
            .registry
            .private_connections(MemberId(12345))
            .is_empty()
    );

    // Still usable as an anonymous connection.
    assert_eq!(
        client.subscribe("match").await,
        r#"{"code":200,"message":"subscribe match success"}"#
    );
}

#[tokio::test]
async fn test_missing_auth_times_out() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect().await;

    let reply = client.try_recv(Duration::from_secs(3)).await;
    assert_eq!(
        reply.as_deref(),
        Some(r#"{"code":400,"message":"missing auth message"}"#)
    );
    client.expect_closed().await;
    assert!(app.eventually(|engine| engine.live_connections() == 0).await);
}

#[tokio::test]
async fn test_unparseable_auth_closes() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect().await;

    client.send("hello?").await;
    assert_eq!(
        client.recv().await,
        r#"{"code":400,"message":"missing auth message"}"#
    );
    client.expect_closed().await;
}

#[tokio::test]
async fn test_private_push_reaches_member_connections_only() {
    let app = helpers::TestApp::spawn().await;
    let mut first = app.subscriber(123456, "im").await;
    let mut second = app.subscriber(123456, "im").await;
    let mut other = app.subscriber(777, "im").await;

    let envelope = r#"{"app":"im","member_id":123456,"text":"hi"}"#;
    assert_eq!(app.push(envelope).await, StatusCode::ACCEPTED);

    assert_eq!(first.recv().await, envelope);
    assert_eq!(second.recv().await, envelope);
    other.assert_silent().await;
}

#[tokio::test]
async fn test_public_push_reaches_app_subscribers_only() {
    let app = helpers::TestApp::spawn().await;
    let mut a = app.subscriber(-1, "match").await;
    let mut b = app.subscriber(42, "match").await;
    let mut elsewhere = app.subscriber(-1, "news").await;
    let mut private = app.subscriber(42, "im").await;

    let envelope = r#"{"app":"match","member_id":-1,"text":"x"}"#;
    assert_eq!(app.push(envelope).await, StatusCode::ACCEPTED);

    assert_eq!(a.recv().await, envelope);
    assert_eq!(b.recv().await, envelope);
    elsewhere.assert_silent().await;
    private.assert_silent().await;
}

#[tokio::test]
async fn test_bad_push_is_rejected() {
    let app = helpers::TestApp::spawn().await;
    let mut subscriber = app.subscriber(-1, "match").await;

    assert_eq!(app.push("{").await, StatusCode::BAD_REQUEST);
    assert_eq!(
        app.push(r#"{"app":"match","member_id":"one","text":"x"}"#).await,
        StatusCode::BAD_REQUEST
    );
    subscriber.assert_silent().await;
}

#[tokio::test]
async fn test_push_with_absent_fields_delivers_zero_values() {
    let app = helpers::TestApp::spawn().await;
    let mut subscriber = app.subscriber(-1, "match").await;

    assert_eq!(app.push(r#"{"app":"match"}"#).await, StatusCode::ACCEPTED);
    assert_eq!(
        subscriber.recv().await,
        r#"{"app":"match","member_id":0,"text":""}"#
    );
}

#[tokio::test]
async fn test_null_member_auth_is_stranger() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect().await;

    client.send(r#"{"member_id":null}"#).await;
    assert_eq!(client.recv().await, r#"{"code":200,"message":"hello stranger"}"#);
    assert_eq!(
        client.subscribe("match").await,
        r#"{"code":200,"message":"subscribe match success"}"#
    );
}

#[tokio::test]
async fn test_abrupt_close_cleans_both_channels() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect_as(555, "t").await;
    client.subscribe("im").await;
    client.subscribe("match").await;

    assert_eq!(app.engine.registry.private_connections(MemberId(555)).len(), 1);
    assert_eq!(app.engine.registry.public_connections("match").len(), 1);

    client.abort();

    assert!(
        app.eventually(|engine| {
            engine.registry.private_connections(MemberId(555)).is_empty()
                && engine.registry.public_connections("match").is_empty()
        })
        .await
    );
}

#[tokio::test]
async fn test_malformed_subscribe_keeps_connection() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect_as(-1, "").await;

    client.send("not json").await;
    assert_eq!(
        client.recv().await,
        r#"{"code":400,"message":"bad subscribe message"}"#
    );
    client.send(r#"{"app":7}"#).await;
    assert_eq!(
        client.recv().await,
        r#"{"code":400,"message":"bad subscribe message"}"#
    );

    assert_eq!(
        client.subscribe("match").await,
        r#"{"code":200,"message":"subscribe match success"}"#
    );
}

#[tokio::test]
async fn test_subscribe_without_app_joins_empty_app() {
    let app = helpers::TestApp::spawn().await;
    let mut client = app.connect_as(-1, "").await;

    client.send("{}").await;
    assert_eq!(
        client.recv().await,
        r#"{"code":200,"message":"subscribe  success"}"#
    );
    assert_eq!(app.engine.registry.public_connections("").len(), 1);
}

#[tokio::test]
async fn test_health_on_gateway_router() {
    use tower::ServiceExt;

    let app = helpers::TestApp::spawn().await;
    let _client = app.subscriber(-1, "match").await;

    let response = app
        .router
        .clone()
        .oneshot(
            axum::http::Request::get("/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
