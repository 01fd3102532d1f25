//! Router configuration for the REST command API.
//!
//! Every path and method is routed to the same handler. Resolution against
//! command templates happens in the dispatcher, not in axum.
//!
//! # Example
//!
//! ```ignore
//! use rest_dispatch::server::routes::{create_router, RouterConfig};
//!
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://example.com".to_string()])
//!     .with_handler_timeout(Some(Duration::from_secs(10)));
//!
//! let router = create_router(dispatcher, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:7878").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{routing::any, Router};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{dispatch_handler, AppState};
use crate::rest::Dispatcher;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// How long to wait for a command before answering with a timeout
    pub handler_timeout: Option<Duration>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a router configuration.
    ///
    /// By default CORS allows any origin, tracing is enabled and commands
    /// have no timeout.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
            handler_timeout: None,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Set the handler timeout.
    pub fn with_handler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handler_timeout = timeout;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the application router.
///
/// `/` and `/{*path}` both go to the dispatch handler for any method, with
/// CORS and (optionally) request tracing layered on top.
pub fn create_router(dispatcher: Dispatcher, config: RouterConfig) -> Router {
    let state = AppState::new(dispatcher).with_handler_timeout(config.handler_timeout);
    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/", any(dispatch_handler))
        .route("/{*path}", any(dispatch_handler))
        .with_state(state)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        // No origins allowed
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
