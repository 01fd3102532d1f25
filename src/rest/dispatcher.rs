//! Request dispatch.
//!
//! The dispatcher drives one request through a fixed sequence of stages:
//!
//! ```text
//! Received ──resolve──▶ Matched ──authorize──▶ Authorized ──merge params──▶
//! ParamsResolved ──invoke──▶ Invoked ──normalize──▶ Responded
//!     │                    │                                     │
//!     └── 404 ─────────────┴── 403 ──────────── 500 (fault) ─────┘──▶ Responded(error)
//! ```
//!
//! Every path ends in exactly one [`RestObject`]. Handler panics are caught
//! and reported as faults; they never unwind into the transport.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use http::Method;
use tracing::{debug, error, warn};

use crate::error::{CommandError, DispatchError};

use super::auth::{authorize, AuthConfig};
use super::params::{ParameterView, Parameters};
use super::registry::RouteRegistry;
use super::response::RestObject;

// =============================================================================
// Request
// =============================================================================

/// A transport-neutral request.
///
/// Routes are matched against `segments`, which hold the path after its
/// leading `/` split on `/` and then percent-decoded. `path` is kept for
/// logging.
#[derive(Debug, Clone)]
pub struct RestRequest {
    /// HTTP method, informational only; routes match any method
    pub method: Method,

    /// Request path, e.g. `/users/read/Alice/info`
    pub path: String,

    /// Decoded path segments
    pub segments: Vec<String>,

    /// Query-string and form-body parameters
    pub params: Parameters,

    /// Token supplied by the caller, if any
    pub token: Option<String>,
}

impl RestRequest {
    /// Create a GET request with no parameters or token.
    ///
    /// `path` is split on `/` as-is; no decoding happens here.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let segments = split_segments(&path, |part| part.to_string());
        Self::with_segments(path, segments)
    }

    /// Create a GET request from a raw path and its decoded segments.
    pub fn with_segments(path: impl Into<String>, segments: Vec<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            segments,
            params: Parameters::new(),
            token: None,
        }
    }

    /// Set the method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a query/body parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Split a path after its leading `/`, mapping every segment.
///
/// A path without the leading `/` yields no segments and matches nothing.
pub fn split_segments(path: &str, map: impl Fn(&str) -> String) -> Vec<String> {
    match path.strip_prefix('/') {
        Some(body) => body.split('/').map(map).collect(),
        None => Vec::new(),
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Matches, authorizes and runs commands.
///
/// Cheap to clone; the registry and configuration are shared read-only.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<RouteRegistry>,
    auth: Arc<AuthConfig>,
}

impl Dispatcher {
    /// Create a dispatcher over a finished registry.
    pub fn new(registry: RouteRegistry, auth: AuthConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            auth: Arc::new(auth),
        }
    }

    /// The registry routes are resolved against.
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// The authorization settings.
    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// Run a request to completion.
    ///
    /// Always returns a response; failures are turned into error objects.
    pub fn dispatch(&self, request: &RestRequest) -> RestObject {
        match self.try_dispatch(request) {
            Ok(object) => object,
            Err(err) => error_object(&err),
        }
    }

    fn try_dispatch(&self, request: &RestRequest) -> Result<RestObject, DispatchError> {
        // Received -> Matched
        let found = self
            .registry
            .resolve_segments(&request.segments)
            .ok_or_else(|| DispatchError::RouteNotFound {
                path: request.path.clone(),
            })?;
        let command = found.command;
        let template = command.template().as_str();

        // Matched -> Authorized
        authorize(command.is_protected(), request.token.as_deref(), &self.auth).map_err(
            |reason| DispatchError::Unauthorized {
                path: request.path.clone(),
                reason,
                forced: !command.is_protected(),
            },
        )?;

        // Authorized -> ParamsResolved
        let view = ParameterView::new(&found.verbs, &request.params);

        debug!(
            method = %request.method,
            path = %request.path,
            template = template,
            "Dispatching command"
        );

        // ParamsResolved -> Invoked
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| command.invoke(&found.verbs, &view)))
            .map_err(|payload| DispatchError::HandlerFault {
                template: template.to_string(),
                message: panic_message(payload.as_ref()),
            })?;

        // Invoked -> Responded
        match outcome {
            Ok(Some(object)) => Ok(object),
            Ok(None) => Ok(RestObject::ok()),
            Err(CommandError::Fault(message)) => Err(DispatchError::HandlerFault {
                template: template.to_string(),
                message,
            }),
            Err(err) => {
                debug!(
                    template = template,
                    status = err.status(),
                    "Command rejected request: {}",
                    err
                );
                Ok(RestObject::error(err.status().to_string(), err.to_string()))
            }
        }
    }
}

/// Turn a dispatcher failure into the response sent to the caller.
///
/// Logs by severity: faults at error, denied tokens at warn, the rest at
/// debug.
pub fn error_object(err: &DispatchError) -> RestObject {
    let status = err.status();
    let error_type = err.error_type();

    match err {
        DispatchError::HandlerFault { .. } | DispatchError::Timeout { .. } => {
            error!(error_type = error_type, status = status, "Server error: {}", err);
        }
        DispatchError::Unauthorized { .. } => {
            warn!(error_type = error_type, status = status, "Authorization failed: {}", err);
        }
        DispatchError::RouteNotFound { .. } => {
            debug!(error_type = error_type, status = status, "Route not found: {}", err);
        }
    }

    RestObject::error(status.to_string(), err.client_message())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

// =============================================================================
// Tests
// =============================================================================
