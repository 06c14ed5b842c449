//! Application state and the startup load phase

use crate::config::ServerConfig;
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use modelhost_models::{Dispatcher, PluginLoader, SharedRegistry};
use std::sync::Arc;
use tracing::info;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Dispatcher over the model registry
    pub dispatcher: Dispatcher,

    /// Prometheus metrics handle for rendering, if an exporter is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Initialize application state with the built-in models
    pub fn new(config: ServerConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        Self::with_loader(config, &PluginLoader::with_builtin_models(), metrics_handle)
    }

    /// Initialize application state, resolving configured models through `loader`
    ///
    /// This is the load phase: it completes before the state exists, so no
    /// request can observe a partially populated registry.
    pub fn with_loader(
        config: ServerConfig,
        loader: &PluginLoader,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Result<Self> {
        info!("Loading {} configured models", config.models.len());
        let registry = SharedRegistry::load(loader, &config.models)?;
        info!("Model registry ready with {} models", registry.len());

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(registry),
            metrics_handle,
        })
    }
}
