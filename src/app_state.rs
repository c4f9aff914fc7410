//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::hub::Hub;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The process-wide hub: connection, membership, and routing state.
    pub hub: Arc<Hub>,
    /// Immutable gateway configuration.
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Builds state around a fresh hub.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            hub: Arc::new(Hub::new()),
            config: Arc::new(config),
        }
    }
}
