//! HTTP handler for the REST command API.
//!
//! A single catch-all handler turns every incoming request into a
//! [`RestRequest`], runs it through the [`Dispatcher`] on the blocking pool
//! and writes the resulting [`RestObject`] back as JSON.
//!
//! # Request mapping
//!
//! - Path: split on `/` first, then each segment percent-decoded, so an
//!   escaped `%2F` stays inside its segment
//! - Parameters: query string, then `application/x-www-form-urlencoded` body;
//!   the first occurrence of a key wins and query values win over body values
//! - Token: the `token` parameter, or `Authorization: Bearer <token>`
//!
//! # Response
//!
//! The body is the flat JSON rendering of the object. The HTTP status mirrors
//! the object's `status` when it is a valid status code, `200` otherwise.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tokio::task::JoinError;
use tracing::{debug, error};
use url::form_urlencoded;

use crate::error::DispatchError;
use crate::rest::{error_object, split_segments, Dispatcher, Parameters, RestObject, RestRequest};

/// Name of the query/body parameter carrying the API token.
pub const TOKEN_PARAM: &str = "token";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The dispatcher every request goes through
    pub dispatcher: Dispatcher,

    /// How long to wait for a command before answering with a timeout
    pub handler_timeout: Option<Duration>,
}

impl AppState {
    /// Create a state with no handler timeout.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            handler_timeout: None,
        }
    }

    /// Set the handler timeout.
    pub fn with_handler_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.handler_timeout = timeout;
        self
    }
}

// =============================================================================
// Response Mapping
// =============================================================================

impl IntoResponse for RestObject {
    fn into_response(self) -> Response {
        let status = self
            .status_code()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::OK);

        (status, Json(self)).into_response()
    }
}

// =============================================================================
// Request Mapping
// =============================================================================

/// Build a transport-neutral request from the HTTP parts.
pub fn build_request(method: Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> RestRequest {
    let raw_path = uri.path();
    let segments = split_segments(raw_path, decode_segment);

    let mut params = Parameters::new();
    let query = uri.query().unwrap_or("");
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        params.insert_if_absent(key, value);
    }
    if is_form_body(headers) {
        for (key, value) in form_urlencoded::parse(body) {
            params.insert_if_absent(key, value);
        }
    }

    let token = params
        .get(TOKEN_PARAM)
        .filter(|t| !t.is_empty())
        .or_else(|| bearer_token(headers))
        .map(str::to_string);

    let mut request = RestRequest::with_segments(raw_path, segments).with_method(method);
    request.params = params;
    request.token = token;
    request
}

fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            // Not valid UTF-8 once decoded; match against the raw segment
            debug!(segment = raw, "Path segment did not decode, using it verbatim");
            raw.to_string()
        }
    }
}

fn is_form_body(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
        .unwrap_or(false)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim())
    } else {
        None
    }
}

// =============================================================================
// Handler
// =============================================================================

/// Handle any request by dispatching it to the registered commands.
///
/// Always answers with a JSON object; unknown paths, denied tokens and
/// failing commands become error objects rather than transport errors.
pub async fn dispatch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> RestObject {
    let request = build_request(method, &uri, &headers, &body);
    let path = request.path.clone();

    let dispatcher = state.dispatcher.clone();
    let task = tokio::task::spawn_blocking(move || dispatcher.dispatch(&request));

    match state.handler_timeout {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined_object(joined, &path),
            // The blocking task keeps running; only the caller stops waiting
            Err(_) => error_object(&DispatchError::Timeout {
                path,
                seconds: limit.as_secs(),
            }),
        },
        None => joined_object(task.await, &path),
    }
}

fn joined_object(joined: Result<RestObject, JoinError>, path: &str) -> RestObject {
    match joined {
        Ok(object) => object,
        Err(e) => {
            error!(path = path, error = %e, "Dispatch task failed");
            error_object(&DispatchError::HandlerFault {
                template: path.to_string(),
                message: e.to_string(),
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
