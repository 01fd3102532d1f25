use thiserror::Error;

use crate::rest::AuthError;

/// Errors raised while parsing a route template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Template does not start with the path separator
    #[error("Template '{template}' must start with '/'")]
    MissingLeadingSlash { template: String },

    /// A `{` was opened but never closed within its segment
    #[error("Unterminated placeholder in template '{template}' at segment {segment}")]
    UnterminatedPlaceholder { template: String, segment: usize },

    /// A `}` appears without a matching `{`
    #[error("Unexpected '}}' in template '{template}' at segment {segment}")]
    UnexpectedClose { template: String, segment: usize },

    /// A placeholder shares its segment with literal text, e.g. `a{b}`
    #[error("Placeholder must span the whole segment in template '{template}' at segment {segment}")]
    EmbeddedPlaceholder { template: String, segment: usize },

    /// `{}` with no name
    #[error("Empty placeholder name in template '{template}' at segment {segment}")]
    EmptyName { template: String, segment: usize },

    /// The same placeholder name is used twice in one template
    #[error("Duplicate placeholder '{name}' in template '{template}'")]
    DuplicateName { template: String, name: String },
}

/// Errors reported by domain collaborators (user, ban, player and world stores)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The entity already exists
    #[error("Already exists: {0}")]
    Conflict(String),

    /// The backing store failed
    #[error("Store error: {0}")]
    Backend(String),
}

/// Errors a command handler reports back to the dispatcher.
///
/// Handlers may also build an error [`RestObject`](crate::rest::RestObject)
/// themselves; returning a `CommandError` is the shorthand for the common
/// cases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Missing or invalid parameter (400)
    #[error("{0}")]
    BadRequest(String),

    /// Referenced user, ban or player does not exist.
    ///
    /// Reported as 400, not 404, so existing clients keep working.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure inside the handler or a collaborator (500)
    #[error("{0}")]
    Fault(String),
}

impl CommandError {
    /// Shorthand for [`CommandError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        CommandError::BadRequest(message.into())
    }

    /// Shorthand for [`CommandError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        CommandError::NotFound(message.into())
    }

    /// Status code carried by the error response.
    pub fn status(&self) -> u16 {
        match self {
            CommandError::BadRequest(_) | CommandError::NotFound(_) => 400,
            CommandError::Fault(_) => 500,
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => CommandError::NotFound(what),
            StoreError::Conflict(what) => CommandError::BadRequest(what),
            StoreError::Backend(message) => CommandError::Fault(message),
        }
    }
}

/// Failures detected by the dispatcher itself.
///
/// Each variant becomes an error [`RestObject`](crate::rest::RestObject);
/// none of them reach the transport as a raw error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No registered template matches the path
    #[error("No route matches {path}")]
    RouteNotFound { path: String },

    /// The authorization gate denied the request.
    ///
    /// `forced` is set when the route itself is open but the deployment
    /// requires a token everywhere.
    #[error("Unauthorized request for {path}: {reason}")]
    Unauthorized {
        path: String,
        reason: AuthError,
        forced: bool,
    },

    /// The handler panicked or reported an internal fault
    #[error("Handler for {template} failed: {message}")]
    HandlerFault { template: String, message: String },

    /// The handler did not finish within the configured timeout
    #[error("Handler for {path} timed out after {seconds}s")]
    Timeout { path: String, seconds: u64 },
}

impl DispatchError {
    /// Status code reported to the caller.
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::RouteNotFound { .. } => 404,
            DispatchError::Unauthorized { .. } => 403,
            DispatchError::HandlerFault { .. } => 500,
            DispatchError::Timeout { .. } => 504,
        }
    }

    /// Short machine-readable identifier, used in logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            DispatchError::RouteNotFound { .. } => "route_not_found",
            DispatchError::Unauthorized { reason, .. } => reason.error_type(),
            DispatchError::HandlerFault { .. } => "handler_fault",
            DispatchError::Timeout { .. } => "timeout",
        }
    }

    /// Description placed in the response's `error` field.
    ///
    /// Internal details (panic messages, collaborator errors) stay in the
    /// logs.
    pub fn client_message(&self) -> &'static str {
        match self {
            DispatchError::RouteNotFound { .. } => {
                "Specified API endpoint doesn't exist. Refer to the documentation for a list of valid endpoints."
            }
            DispatchError::Unauthorized { forced: true, .. } => {
                "Server settings require a token for this API call."
            }
            DispatchError::Unauthorized { forced: false, .. } => {
                "Not authorized. The specified API endpoint requires a token."
            }
            DispatchError::HandlerFault { .. } => {
                "Internal server error. The command failed to complete."
            }
            DispatchError::Timeout { .. } => "The command did not complete in time.",
        }
    }
}

/// Errors a plugin can raise during initialization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    /// A route template supplied by the plugin was malformed
    #[error("Plugin '{plugin}' registered a bad route: {source}")]
    Template {
        plugin: String,
        #[source]
        source: TemplateError,
    },

    /// Any other initialization failure
    #[error("Plugin '{plugin}' failed to initialize: {message}")]
    Initialize { plugin: String, message: String },
}
