//! WebSocket layer: upgrade handling and per-connection sessions.
//!
//! The endpoint at `/ws` is the persistent bidirectional channel every
//! operator and VM agent holds open for the lifetime of its session.

pub mod connection;
pub mod handler;
