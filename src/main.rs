//! REST dispatch server.
//!
//! This binary wires the in-memory collaborators, loads the built-in command
//! plugin and serves the command API over HTTP.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rest_dispatch::{
    commands::{CommandContext, ServerInfo},
    config::Config,
    plugin::{PluginHost, RestCommandsPlugin},
    rest::{Dispatcher, RouteRegistry},
    server::{create_router, RouterConfig},
    store::{MemoryBanStore, MemoryPlayerDirectory, MemoryUserStore, MemoryWorld},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("REST dispatch v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Server: {} (game port {})", config.server_name, config.game_port);
    info!(
        "  World: {} ({}x{})",
        config.world_name, config.world_width, config.world_height
    );
    info!("  Tokens: {} configured", config.tokens.len());
    if config.tokens.is_empty() {
        warn!("  No tokens configured - every protected endpoint will answer 403");
    }
    if config.require_token_everywhere {
        info!("  Token required on every endpoint");
    }
    match config.handler_timeout {
        Some(seconds) => info!("  Handler timeout: {}s", seconds),
        None => info!("  Handler timeout: none"),
    }

    // Collaborators
    let ctx = Arc::new(CommandContext::new(
        ServerInfo {
            name: config.server_name.clone(),
            port: config.game_port,
        },
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryBanStore::new()),
        Arc::new(MemoryPlayerDirectory::new()),
        Arc::new(MemoryWorld::new(
            config.world_name.clone(),
            config.world_width,
            config.world_height,
        )),
    ));

    // Plugins register their routes; the host shuts them down when main returns
    let mut registry = RouteRegistry::new();
    let mut plugins = PluginHost::new().with_plugin(RestCommandsPlugin::new(ctx));
    if let Err(e) = plugins.initialize(&mut registry) {
        error!("Plugin error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Routes:");
    for command in registry.commands() {
        let access = if command.is_protected() { "token" } else { "open" };
        info!("  {:<28} {}", command.template().as_str(), access);
    }

    let dispatcher = Dispatcher::new(registry, config.auth_config());
    let router = create_router(dispatcher, build_router_config(&config));

    // Bind and serve
    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("Listening on http://{}", addr);
    info!("  curl http://{}/status", addr);

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "rest_dispatch=debug,tower_http=debug"
    } else {
        "rest_dispatch=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_tracing(!config.no_tracing)
        .with_handler_timeout(config.handler_timeout());

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}
