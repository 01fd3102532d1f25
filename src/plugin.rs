//! Plugin lifecycle.
//!
//! Plugins contribute routes to the registry during startup. The
//! [`PluginHost`] initializes them in ascending [`Plugin::order`] and shuts
//! them down in reverse when it is dropped.
//!
//! ```text
//! load ──▶ sort by order ──▶ initialize(registry) ... ──▶ serve ──▶ drop ──▶ shutdown (reverse)
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::commands::{register_commands, CommandContext};
use crate::error::PluginError;
use crate::rest::RouteRegistry;

/// A unit of functionality that registers REST commands.
pub trait Plugin: Send {
    /// Display name, used in logs and errors.
    fn name(&self) -> &str;

    /// Load order; lower values initialize first.
    fn order(&self) -> i32 {
        0
    }

    /// Register routes.
    fn initialize(&mut self, registry: &mut RouteRegistry) -> Result<(), PluginError>;

    /// Release resources. Called once, in reverse load order.
    fn shutdown(&mut self) {}
}

/// Owns the loaded plugins.
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<Box<dyn Plugin>>,
    initialized: usize,
}

impl PluginHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plugin. Takes effect on the next [`initialize`](Self::initialize).
    pub fn load(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Builder-style [`load`](Self::load).
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.load(Box::new(plugin));
        self
    }

    /// Initialize every plugin that has not been initialized yet, in order.
    ///
    /// Plugins loaded after an earlier call are ordered among themselves and
    /// run after the ones already started. Stops at the first failure;
    /// plugins initialized before it are still shut down when the host is
    /// dropped.
    pub fn initialize(&mut self, registry: &mut RouteRegistry) -> Result<(), PluginError> {
        // Started plugins keep their place; stable sort keeps load order for
        // equal `order` values
        self.plugins[self.initialized..].sort_by_key(|p| p.order());

        for plugin in &mut self.plugins[self.initialized..] {
            let before = registry.len();
            plugin.initialize(registry)?;
            self.initialized += 1;
            info!(
                plugin = plugin.name(),
                routes = registry.len() - before,
                "Plugin initialized"
            );
        }
        Ok(())
    }

    /// Names of the loaded plugins, in initialization order.
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Number of loaded plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is loaded.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Drop for PluginHost {
    fn drop(&mut self) {
        for plugin in self.plugins[..self.initialized].iter_mut().rev() {
            debug!(plugin = plugin.name(), "Shutting down plugin");
            plugin.shutdown();
        }
    }
}

impl std::fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHost")
            .field("plugins", &self.names())
            .field("initialized", &self.initialized)
            .finish()
    }
}

// =============================================================================
// Built-in commands
// =============================================================================

/// Registers the built-in command set.
#[derive(Debug)]
pub struct RestCommandsPlugin {
    ctx: Arc<CommandContext>,
}

impl RestCommandsPlugin {
    pub fn new(ctx: Arc<CommandContext>) -> Self {
        Self { ctx }
    }
}

impl Plugin for RestCommandsPlugin {
    fn name(&self) -> &str {
        "rest-commands"
    }

    fn initialize(&mut self, registry: &mut RouteRegistry) -> Result<(), PluginError> {
        register_commands(registry, Arc::clone(&self.ctx)).map_err(|source| {
            PluginError::Template {
                plugin: self.name().to_string(),
                source,
            }
        })
    }
}
