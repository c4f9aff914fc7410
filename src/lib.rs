//! # fleet-gateway
//!
//! Real-time command-and-control gateway for fleets of remote
//! trading-terminal hosts.
//!
//! Operators and VM agents hold one persistent WebSocket each. The hub
//! tracks live connections and group membership, and routes typed
//! command/response envelopes (group broadcasts, vm-targeted requests,
//! and single-receiver responses) to the correct subset of live
//! connections. Delivery is at-most-once and fire-and-forget; persistence,
//! authentication, and payload validation are external collaborators.
//!
//! ## Architecture
//!
//! ```text
//! Clients (operators, VM agents)
//!     │
//!     ├── WS sessions (ws/)
//!     ├── REST introspection (api/)
//!     │
//!     ├── Hub router (hub/)
//!     │     ├── ConnectionRegistry
//!     │     └── GroupRegistry
//!     │
//!     └── Command catalog (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod hub;
pub mod ws;
