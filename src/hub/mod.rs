//! Hub layer: connection tracking, group membership, and routing.
//!
//! The process-wide shared state lives here, encapsulated behind the
//! registry contracts; nothing outside this module mutates the
//! underlying tables directly.

pub mod groups;
pub mod registry;
pub mod router;

pub use groups::GroupRegistry;
pub use registry::ConnectionRegistry;
pub use router::{Hub, HubStats};
