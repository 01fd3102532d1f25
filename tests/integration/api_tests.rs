//! HTTP API integration tests.
//!
//! Tests verify:
//! - Unknown paths answer 404 with the standard error object
//! - Response bodies are flat JSON with the status first
//! - Any method reaches the dispatcher
//! - Percent-encoded path segments are decoded before matching
//! - Handler panics, faults and timeouts become error objects

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use rest_dispatch::rest::{
    AuthConfig, CommandResult, Dispatcher, ParameterView, RestObject, RestVerbs, RouteRegistry,
    TokenSet,
};
use rest_dispatch::server::create_router;

use super::test_utils::{get, get_with_token, router_config, send, test_server, TEST_TOKEN};

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_unknown_path_is_404() {
    let server = test_server();
    let (status, json) = get(&server.router, "/does/not/exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], "404");
    assert_eq!(
        json["error"],
        "Specified API endpoint doesn't exist. Refer to the documentation for a list of valid endpoints."
    );
}

#[tokio::test]
async fn test_root_path_is_404() {
    let server = test_server();
    let (status, json) = get(&server.router, "/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], "404");
}

#[tokio::test]
async fn test_extra_segment_does_not_match() {
    let server = test_server();
    let (status, _) = get_with_token(&server.router, "/users/read/Alice/info/extra").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_literal_segments_are_case_sensitive() {
    let server = test_server();
    let (status, _) = get(&server.router, "/STATUS").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_method_is_dispatched() {
    let server = test_server();

    for method in ["GET", "POST", "PUT", "DELETE"] {
        let request = Request::builder()
            .method(method)
            .uri("/status")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(&server.router, request).await;
        assert_eq!(status, StatusCode::OK, "method {}", method);
        assert_eq!(json["status"], "200");
    }
}

#[tokio::test]
async fn test_response_is_flat_json_with_status_first() {
    let server = test_server();
    let request = Request::builder()
        .uri("/status")
        .body(Body::empty())
        .unwrap();
    let response = server.router.clone().oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.starts_with(r#"{"status":"200","name":"Integration Server""#));
}

#[tokio::test]
async fn test_percent_encoded_path_is_decoded() {
    let server = test_server();
    server
        .users
        .add_user("John Doe", "pw", "builder")
        .unwrap();

    let (status, json) = get_with_token(&server.router, "/users/read/John%20Doe/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["group"], "builder");
}

#[tokio::test]
async fn test_encoded_slash_is_part_of_the_value() {
    let server = test_server();
    server.users.add_user("a/b", "pw", "slashed").unwrap();

    let (status, json) = get_with_token(&server.router, "/users/read/a%2Fb/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["group"], "slashed");
}

#[tokio::test]
async fn test_encoded_slash_does_not_split_a_segment() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/users/read%2FAlice/info").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], "404");
}

// =============================================================================
// Faults and Timeouts
// =============================================================================

fn panicking(_: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    panic!("simulated collaborator crash")
}

fn sleepy(_: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    std::thread::sleep(Duration::from_millis(500));
    Ok(Some(RestObject::ok().with("response", "late")))
}

fn quick(_: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
    Ok(None)
}

fn fault_router(timeout: Option<Duration>) -> axum::Router {
    let mut registry = RouteRegistry::new();
    registry.route("/panic", panicking, true).unwrap();
    registry.route("/slow", sleepy, false).unwrap();
    registry.route("/quick", quick, false).unwrap();

    let dispatcher = Dispatcher::new(registry, AuthConfig::new(TokenSet::new([TEST_TOKEN])));
    create_router(dispatcher, router_config().with_handler_timeout(timeout))
}

#[tokio::test]
async fn test_handler_panic_is_500() {
    let router = fault_router(None);
    let (status, json) = get_with_token(&router, "/panic").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], "500");
    assert!(!json["error"].as_str().unwrap().contains("simulated"));

    // The server keeps serving afterwards
    let (status, _) = get(&router, "/quick").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_handler_result_is_plain_success() {
    let router = fault_router(None);
    let (status, json) = get(&router, "/quick").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "status": "200" }));
}

#[tokio::test]
async fn test_handler_timeout_is_504() {
    let router = fault_router(Some(Duration::from_millis(50)));
    let (status, json) = get(&router, "/slow").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["status"], "504");
    assert_eq!(json["error"], "The command did not complete in time.");
}

#[tokio::test]
async fn test_slow_handler_without_timeout_completes() {
    let router = fault_router(None);
    let (status, json) = get(&router, "/slow").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "late");
}
