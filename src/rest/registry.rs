//! Route registry.
//!
//! Routes are tried in registration order and the first template that
//! matches wins. Registration order is therefore significant: a specific
//! template such as `/users/activelist` must be registered before a general
//! one such as `/users/{user}` that would otherwise shadow it.
//!
//! Registering a template whose shape is already covered by an earlier route
//! is allowed; the later route is unreachable and a warning is logged.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{CommandError, TemplateError};

use super::params::{ParameterView, RestVerbs};
use super::response::RestObject;
use super::template::PathTemplate;

/// What a handler returns.
///
/// `Ok(None)` means the handler had nothing to report; the dispatcher answers
/// with a plain success object.
pub type CommandResult = Result<Option<RestObject>, CommandError>;

/// Business logic bound to a route.
///
/// Handlers receive the captured path values and the merged parameter view.
/// Any plain function or closure with the matching signature is a handler.
pub trait RestHandler: Send + Sync {
    /// Run the command.
    fn handle(&self, verbs: &RestVerbs, params: &ParameterView<'_>) -> CommandResult;
}

impl<F> RestHandler for F
where
    F: Fn(&RestVerbs, &ParameterView<'_>) -> CommandResult + Send + Sync,
{
    fn handle(&self, verbs: &RestVerbs, params: &ParameterView<'_>) -> CommandResult {
        self(verbs, params)
    }
}

/// A template bound to a handler.
///
/// Routes require a token unless told otherwise.
#[derive(Clone)]
pub struct RestCommand {
    template: PathTemplate,
    handler: Arc<dyn RestHandler>,
    requires_token: bool,
}

impl RestCommand {
    /// Create a token-protected command.
    pub fn new(template: &str, handler: impl RestHandler + 'static) -> Result<Self, TemplateError> {
        Ok(Self {
            template: PathTemplate::parse(template)?,
            handler: Arc::new(handler),
            requires_token: true,
        })
    }

    /// Set whether a token is required.
    pub fn requires_token(mut self, required: bool) -> Self {
        self.requires_token = required;
        self
    }

    /// The parsed template.
    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Whether a token is required.
    pub fn is_protected(&self) -> bool {
        self.requires_token
    }

    /// Invoke the handler.
    pub fn invoke(&self, verbs: &RestVerbs, params: &ParameterView<'_>) -> CommandResult {
        self.handler.handle(verbs, params)
    }
}

impl fmt::Debug for RestCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestCommand")
            .field("template", &self.template.as_str())
            .field("requires_token", &self.requires_token)
            .finish()
    }
}

/// A successful resolution: the selected command and its captured values.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    /// The command whose template matched
    pub command: &'a RestCommand,

    /// Values captured from the path
    pub verbs: RestVerbs,
}

/// Ordered collection of commands.
#[derive(Debug, Default, Clone)]
pub struct RouteRegistry {
    commands: Vec<RestCommand>,
}

impl RouteRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    ///
    /// Logs a warning if an earlier command already covers the same paths.
    pub fn register(&mut self, command: RestCommand) {
        if let Some(existing) = self
            .commands
            .iter()
            .find(|c| c.template.same_shape(&command.template))
        {
            warn!(
                template = command.template.as_str(),
                shadowed_by = existing.template.as_str(),
                "Route is shadowed by an earlier registration and will never match"
            );
        } else {
            debug!(
                template = command.template.as_str(),
                requires_token = command.requires_token,
                "Registered route"
            );
        }
        self.commands.push(command);
    }

    /// Parse a template and register a handler for it.
    pub fn route(
        &mut self,
        template: &str,
        handler: impl RestHandler + 'static,
        requires_token: bool,
    ) -> Result<(), TemplateError> {
        let command = RestCommand::new(template, handler)?.requires_token(requires_token);
        self.register(command);
        Ok(())
    }

    /// Find the first command whose template matches `path`.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let parts: Vec<&str> = path.strip_prefix('/')?.split('/').collect();
        self.resolve_segments(&parts)
    }

    /// Find the first command whose template matches the split segments.
    pub fn resolve_segments<S: AsRef<str>>(&self, parts: &[S]) -> Option<RouteMatch<'_>> {
        self.commands.iter().find_map(|command| {
            command
                .template
                .match_segments(parts)
                .map(|verbs| RouteMatch { command, verbs })
        })
    }

    /// Registered commands in trial order.
    pub fn commands(&self) -> &[RestCommand] {
        &self.commands
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
