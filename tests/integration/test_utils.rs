//! Test utilities for integration tests.
//!
//! Builds a router over the built-in commands and in-memory stores, and
//! provides helpers to send requests and decode the JSON bodies.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use rest_dispatch::commands::{register_commands, CommandContext, ServerInfo};
use rest_dispatch::rest::{AuthConfig, Dispatcher, RouteRegistry, TokenSet};
use rest_dispatch::server::{create_router, RouterConfig};
use rest_dispatch::store::{
    MemoryBanStore, MemoryPlayerDirectory, MemoryUserStore, MemoryWorld, PlayerInfo,
};

pub const TEST_TOKEN: &str = "integration-test-token";

// =============================================================================
// Test Server
// =============================================================================

/// A router plus handles on the stores behind it.
pub struct TestServer {
    pub router: Router,
    pub users: Arc<MemoryUserStore>,
    pub bans: Arc<MemoryBanStore>,
    pub players: Arc<MemoryPlayerDirectory>,
    pub world: Arc<MemoryWorld>,
}

pub fn player(name: &str, account: Option<&str>, ip: &str) -> PlayerInfo {
    PlayerInfo {
        index: 0,
        name: name.to_string(),
        account_name: account.map(str::to_string),
        ip: ip.to_string(),
        group: "default".to_string(),
        tile_x: 1024,
        tile_y: 300,
        inventory: vec!["Iron Broadsword".to_string()],
        buffs: vec![3],
    }
}

/// Server with the built-in commands and seeded stores.
pub fn test_server() -> TestServer {
    build_server(false)
}

/// Server that requires a token on every endpoint.
pub fn locked_down_server() -> TestServer {
    build_server(true)
}

fn build_server(require_everywhere: bool) -> TestServer {
    let users = Arc::new(
        MemoryUserStore::new()
            .with_user("Alice", "secret", "admin")
            .with_user("Bob", "hunter2", "default"),
    );
    let bans = Arc::new(MemoryBanStore::new());
    let players = Arc::new(
        MemoryPlayerDirectory::new()
            .with_player(player("Alice", Some("Alice"), "10.0.0.1"))
            .with_player(player("Griefer", None, "10.0.0.66")),
    );
    let world = Arc::new(MemoryWorld::new("Integration World", 8400, 2400));

    let ctx = Arc::new(CommandContext::new(
        ServerInfo {
            name: "Integration Server".to_string(),
            port: 7777,
        },
        users.clone(),
        bans.clone(),
        players.clone(),
        world.clone(),
    ));

    let mut registry = RouteRegistry::new();
    register_commands(&mut registry, ctx).unwrap();

    let auth = AuthConfig::new(TokenSet::new([TEST_TOKEN]))
        .with_require_token_everywhere(require_everywhere);

    let router = create_router(Dispatcher::new(registry, auth), router_config());

    TestServer {
        router,
        users,
        bans,
        players,
        world,
    }
}

/// Router configuration used by tests: tracing off.
pub fn router_config() -> RouterConfig {
    RouterConfig::new().with_tracing(false)
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Send a request and decode the JSON body.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

/// GET a URI.
pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

/// GET a URI with the test token appended as a query parameter.
pub async fn get_with_token(router: &Router, uri: &str) -> (StatusCode, Value) {
    let separator = if uri.contains('?') { '&' } else { '?' };
    get(router, &format!("{}{}token={}", uri, separator, TEST_TOKEN)).await
}

/// POST a form-encoded body.
pub async fn post_form(router: &Router, uri: &str, form: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(router, request).await
}
