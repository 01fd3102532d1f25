//! Authentication integration tests.
//!
//! Tests verify:
//! - Open endpoints work without a token
//! - Protected endpoints reject missing and wrong tokens
//! - Tokens are accepted from the query, a form body or a bearer header
//! - Requiring tokens everywhere locks open endpoints too

use axum::body::Body;
use axum::http::{header, Request, StatusCode};

use rest_dispatch::store::UserStore;

use super::test_utils::{
    get, get_with_token, locked_down_server, post_form, send, test_server, TEST_TOKEN,
};

const NOT_AUTHORIZED: &str = "Not authorized. The specified API endpoint requires a token.";
const TOKEN_REQUIRED: &str = "Server settings require a token for this API call.";

// =============================================================================
// Open Endpoints
// =============================================================================

#[tokio::test]
async fn test_status_is_open() {
    let server = test_server();
    let (status, json) = get(&server.router, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Integration Server");
}

#[tokio::test]
async fn test_status_with_wrong_token_still_open() {
    let server = test_server();
    let (status, _) = get(&server.router, "/status?token=wrong").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Protected Endpoints
// =============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    let server = test_server();
    let (status, json) = get(&server.router, "/tokentest").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["status"], "403");
    assert_eq!(json["error"], NOT_AUTHORIZED);
}

#[tokio::test]
async fn test_empty_token_rejected() {
    let server = test_server();
    let (status, _) = get(&server.router, "/tokentest?token=").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let server = test_server();
    let (status, json) = get(&server.router, "/tokentest?token=not-the-token").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], NOT_AUTHORIZED);
}

#[tokio::test]
async fn test_denied_request_never_reaches_handler() {
    let server = test_server();
    let (status, _) = get(&server.router, "/users/destroy/Alice").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(server.users.get_user_by_name("Alice").unwrap().is_some());
}

#[tokio::test]
async fn test_query_token_accepted() {
    let server = test_server();
    let (status, json) = get_with_token(&server.router, "/tokentest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["response"],
        "Token is valid and was passed through correctly."
    );
}

#[tokio::test]
async fn test_form_body_token_accepted() {
    let server = test_server();
    let (status, _) = post_form(
        &server.router,
        "/tokentest",
        &format!("token={}", TEST_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_token_accepted() {
    let server = test_server();
    let request = Request::builder()
        .uri("/tokentest")
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&server.router, request).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Token Required Everywhere
// =============================================================================

#[tokio::test]
async fn test_locked_down_status_requires_token() {
    let server = locked_down_server();
    let (status, json) = get(&server.router, "/status").await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], TOKEN_REQUIRED);
}

#[tokio::test]
async fn test_locked_down_status_with_token() {
    let server = locked_down_server();
    let (status, json) = get_with_token(&server.router, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["playercount"], "2");
}

#[tokio::test]
async fn test_locked_down_protected_message_unchanged() {
    let server = locked_down_server();
    let (_, json) = get(&server.router, "/tokentest").await;
    assert_eq!(json["error"], NOT_AUTHORIZED);
}

#[tokio::test]
async fn test_locked_down_unknown_path_is_still_404() {
    let server = locked_down_server();
    let (status, _) = get(&server.router, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_token_parameter_does_not_mask_bearer() {
    let server = test_server();
    let request = Request::builder()
        .uri("/tokentest?token=")
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&server.router, request).await;
    assert_eq!(status, StatusCode::OK);
}
