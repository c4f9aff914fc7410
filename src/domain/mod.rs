//! Domain layer: identifiers, the command catalog, and wire frames.
//!
//! This module contains the hub's data model: connection identity,
//! caller-supplied group and VM identifiers, the fixed catalog of
//! command kinds with their addressing rules, and the outbound frame
//! set delivered to clients.

pub mod command;
pub mod connection_id;
pub mod frame;
pub mod ids;

pub use command::{Addressing, CommandKind, HubCommand};
pub use connection_id::ConnectionId;
pub use frame::ServerFrame;
pub use ids::{GroupId, VmId};
