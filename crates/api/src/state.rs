use std::sync::Arc;

use relay_events::TaskRunner;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Task runner that produces the relayed streams.
    pub runner: Arc<dyn TaskRunner>,
}
