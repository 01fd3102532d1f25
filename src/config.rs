//! Configuration management for the REST dispatch server.
//!
//! Settings come from command-line arguments or environment variables with
//! the `REST_` prefix, with defaults for everything optional.
//!
//! # Example
//!
//! ```ignore
//! use rest_dispatch::config::Config;
//!
//! let config = Config::parse();
//! println!("Listening on {}", config.bind_address());
//! ```
//!
//! # Environment Variables
//!
//! - `REST_HOST` - Bind address (default: 0.0.0.0)
//! - `REST_PORT` - REST API port (default: 7878)
//! - `REST_SERVER_NAME` - Name reported by `/status`
//! - `REST_GAME_PORT` - Game port reported by `/status` (default: 7777)
//! - `REST_TOKENS` - Accepted API tokens (comma-separated)
//! - `REST_REQUIRE_TOKEN_EVERYWHERE` - Require a token on open endpoints too
//! - `REST_HANDLER_TIMEOUT` - Seconds before a command is answered with a timeout
//! - `REST_CORS_ORIGINS` - Allowed CORS origins (comma-separated)
//! - `REST_WORLD_NAME`, `REST_WORLD_WIDTH`, `REST_WORLD_HEIGHT` - In-memory world

use std::time::Duration;

use clap::Parser;

use crate::rest::{AuthConfig, TokenSet};

// =============================================================================
// Default Values
// =============================================================================

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default REST API port.
pub const DEFAULT_PORT: u16 = 7878;

/// Default game port reported by `/status`.
pub const DEFAULT_GAME_PORT: u16 = 7777;

/// Default server name.
pub const DEFAULT_SERVER_NAME: &str = "Terraria Server";

/// Default world dimensions, in tiles.
pub const DEFAULT_WORLD_WIDTH: u32 = 4200;
pub const DEFAULT_WORLD_HEIGHT: u32 = 1200;

// =============================================================================
// CLI Arguments
// =============================================================================

/// REST dispatch server - token-gated command API for a game server.
#[derive(Parser, Debug, Clone)]
#[command(name = "rest-dispatch")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the REST API to.
    #[arg(long, default_value = DEFAULT_HOST, env = "REST_HOST")]
    pub host: String,

    /// Port for the REST API.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "REST_PORT")]
    pub port: u16,

    /// Server name reported by `/status`.
    #[arg(long, default_value = DEFAULT_SERVER_NAME, env = "REST_SERVER_NAME")]
    pub server_name: String,

    /// Game port reported by `/status`.
    #[arg(long, default_value_t = DEFAULT_GAME_PORT, env = "REST_GAME_PORT")]
    pub game_port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Accepted API tokens (comma-separated).
    #[arg(long, env = "REST_TOKENS", value_delimiter = ',')]
    pub tokens: Vec<String>,

    /// Require a token on every endpoint, including open ones like `/status`.
    #[arg(long, default_value_t = false, env = "REST_REQUIRE_TOKEN_EVERYWHERE")]
    pub require_token_everywhere: bool,

    // =========================================================================
    // Dispatch Configuration
    // =========================================================================
    /// Seconds to wait for a command before answering with a timeout.
    ///
    /// If not specified, commands may run indefinitely.
    #[arg(long, env = "REST_HANDLER_TIMEOUT")]
    pub handler_timeout: Option<u64>,

    // =========================================================================
    // World Configuration
    // =========================================================================
    /// Name of the in-memory world.
    #[arg(long, default_value = "World", env = "REST_WORLD_NAME")]
    pub world_name: String,

    /// Width of the in-memory world, in tiles.
    #[arg(long, default_value_t = DEFAULT_WORLD_WIDTH, env = "REST_WORLD_WIDTH")]
    pub world_width: u32,

    /// Height of the in-memory world, in tiles.
    #[arg(long, default_value_t = DEFAULT_WORLD_HEIGHT, env = "REST_WORLD_HEIGHT")]
    pub world_height: u32,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "REST_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.tokens.iter().any(|t| t.trim().is_empty()) {
            return Err("API tokens must not be empty".to_string());
        }

        // Nothing would be reachable
        if self.require_token_everywhere && self.tokens.is_empty() {
            return Err(
                "Tokens are required everywhere but none are configured. \
                 Set --tokens or REST_TOKENS, or drop --require-token-everywhere"
                    .to_string(),
            );
        }

        if self.handler_timeout == Some(0) {
            return Err("handler_timeout must be greater than 0".to_string());
        }

        if self.server_name.is_empty() {
            return Err("server_name must not be empty".to_string());
        }

        if self.world_width == 0 || self.world_height == 0 {
            return Err("world dimensions must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the authorization settings.
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(TokenSet::new(self.tokens.iter().map(|t| t.trim())))
            .with_require_token_everywhere(self.require_token_everywhere)
    }

    /// Handler timeout as a duration.
    pub fn handler_timeout(&self) -> Option<Duration> {
        self.handler_timeout.map(Duration::from_secs)
    }
}

// =============================================================================
// Tests
// =============================================================================
