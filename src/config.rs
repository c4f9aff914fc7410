//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), with sensible defaults for local
//! development.

use std::net::SocketAddr;

use crate::error::GatewayError;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Maximum size of one inbound WebSocket message in bytes. Bounds
    /// memory use from a misbehaving client.
    pub max_message_bytes: usize,

    /// Maximum number of inbound envelopes one connection may have in
    /// flight concurrently.
    pub max_parallel_invocations: usize,

    /// Capacity of each connection's outbound frame queue. When a slow
    /// client fills it, further frames to that client are dropped.
    pub send_queue_capacity: usize,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if `LISTEN_ADDR` is set but
    /// cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|e| GatewayError::Config(format!("invalid LISTEN_ADDR: {e}")))?;

        let max_message_bytes = parse_env("MAX_MESSAGE_BYTES", 20_000_000);
        let max_parallel_invocations = parse_env("MAX_PARALLEL_INVOCATIONS", 20);
        let send_queue_capacity = parse_env("SEND_QUEUE_CAPACITY", 256);

        Ok(Self {
            listen_addr,
            max_message_bytes,
            max_parallel_invocations,
            send_queue_capacity,
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_message_bytes: 20_000_000,
            max_parallel_invocations: 20,
            send_queue_capacity: 256,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
