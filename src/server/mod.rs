//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                   ANY /{*path}?token=...                        │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │         handlers         │  │           routes            │  │
//! │  │ (decode, params, token,  │  │  (catch-all, CORS, trace)   │  │
//! │  │  blocking dispatch)      │  │                             │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                    rest::Dispatcher::dispatch
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{build_request, dispatch_handler, AppState, TOKEN_PARAM};
pub use routes::{create_router, RouterConfig};
