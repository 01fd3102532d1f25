//! # REST Dispatch
//!
//! A token-gated REST command engine for administering a game server.
//!
//! Commands are registered against path templates such as
//! `/users/read/{user}/info`. Each request is matched against the templates
//! in registration order, checked against the configured API tokens, and
//! handed to its command with the captured path values and the query/body
//! parameters. Every request ends in a status-coded [`RestObject`].
//!
//! ## Architecture
//!
//! - [`rest`] - Templates, registry, token gate, dispatcher and response type
//! - [`commands`] - The built-in command set (users, bans, world, players)
//! - [`store`] - Collaborator traits plus in-memory implementations
//! - [`plugin`] - Plugin lifecycle and the built-in commands plugin
//! - [`server`] - Axum adapter: catch-all route, CORS, tracing
//! - [`config`] - CLI and environment configuration
//!
//! ## Example
//!
//! ```rust
//! use rest_dispatch::{AuthConfig, Dispatcher, RestObject, RestRequest, RouteRegistry, TokenSet};
//! use rest_dispatch::rest::{CommandResult, ParameterView, RestVerbs};
//!
//! fn hello(verbs: &RestVerbs, _: &ParameterView<'_>) -> CommandResult {
//!     let name = verbs.get("name").unwrap_or("world");
//!     Ok(Some(RestObject::ok().with("greeting", format!("Hello, {}", name))))
//! }
//!
//! let mut registry = RouteRegistry::new();
//! registry.route("/hello/{name}", hello, false).unwrap();
//!
//! let dispatcher = Dispatcher::new(registry, AuthConfig::new(TokenSet::new(["secret"])));
//! let response = dispatcher.dispatch(&RestRequest::new("/hello/Alice"));
//! assert_eq!(response["greeting"], "Hello, Alice");
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod plugin;
pub mod rest;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use commands::{register_commands, CommandContext, ServerInfo};
pub use config::Config;
pub use error::{CommandError, DispatchError, PluginError, StoreError, TemplateError};
pub use plugin::{Plugin, PluginHost, RestCommandsPlugin};
pub use rest::{
    AuthConfig, AuthError, Dispatcher, PathTemplate, RestCommand, RestObject, RestRequest,
    RouteRegistry, TokenSet,
};
pub use server::{create_router, AppState, RouterConfig};
