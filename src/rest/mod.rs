//! REST command engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Dispatcher                             │
//! │      resolve ──▶ authorize ──▶ merge params ──▶ invoke          │
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │   registry   │  │     auth     │  │        params         │  │
//! │  │ (templates,  │  │ (token gate) │  │ (path + query lookup) │  │
//! │  │  first match)│  │              │  │                       │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────────┘  │
//! │                                                                 │
//! │                 handler ──▶ RestObject (response)               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine knows nothing about sockets or wire formats; the
//! [`server`](crate::server) module adapts it to HTTP.

pub mod auth;
pub mod dispatcher;
pub mod params;
pub mod registry;
pub mod response;
pub mod template;

pub use auth::{authorize, AuthConfig, AuthError, TokenSet};
pub use dispatcher::{error_object, split_segments, Dispatcher, RestRequest};
pub use params::{ParameterView, Parameters, RestVerbs};
pub use registry::{CommandResult, RestCommand, RestHandler, RouteMatch, RouteRegistry};
pub use response::{RestObject, STATUS_OK};
pub use template::{PathTemplate, Segment};
