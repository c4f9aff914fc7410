//! Outbound wire frames pushed from the hub to connected clients.
//!
//! A [`ServerFrame`] is either a relayed [`HubCommand`] or one of the
//! session/membership lifecycle frames. Relayed frames are stamped with
//! the sender's [`ConnectionId`] (so a responder can address its reply)
//! and, for vm-targeted requests, with the target [`VmId`] that listeners
//! filter on locally.

use serde::{Deserialize, Serialize};

use super::command::HubCommand;
use super::connection_id::ConnectionId;
use super::ids::{GroupId, VmId};

/// One frame sent from the hub to a client, serialized as a single JSON
/// text message. Internally tagged on `"type"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Sent once when the session is established, carrying the identifier
    /// the registry assigned to this channel.
    Connected {
        /// The caller's own connection identifier.
        connection_id: ConnectionId,
    },

    /// Acknowledges the caller's own `join_group`.
    Joined {
        /// Group that was joined.
        group_id: GroupId,
    },

    /// Acknowledges the caller's own `leave_group`.
    Left {
        /// Group that was left.
        group_id: GroupId,
    },

    /// Advisory notice to the rest of the group that a connection joined.
    MemberJoined {
        /// Group the member joined.
        group_id: GroupId,
        /// The joining connection.
        connection_id: ConnectionId,
    },

    /// Advisory notice to the remaining members that a connection left.
    MemberLeft {
        /// Group the member left.
        group_id: GroupId,
        /// The departing connection.
        connection_id: ConnectionId,
    },

    /// A relayed command envelope.
    Command {
        /// Connection that pushed the original envelope into the hub.
        sender: ConnectionId,
        /// Machine the request is aimed at; absent on plain broadcasts
        /// and responses.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_vm: Option<VmId>,
        /// The original envelope, flattened into this frame.
        #[serde(flatten)]
        command: HubCommand,
    },

    /// Boundary rejection of a malformed inbound message.
    Error {
        /// Human-readable rejection reason.
        message: String,
    },
}

impl ServerFrame {
    /// Builds the relay frame for an envelope pushed by `sender`.
    ///
    /// The target stamp is taken from the envelope's own catalog rule;
    /// kinds without a vm target relay unstamped.
    #[must_use]
    pub fn relay(sender: ConnectionId, command: HubCommand) -> Self {
        let target_vm = command.target_vm().cloned();
        Self::Command {
            sender,
            target_vm,
            command,
        }
    }

    /// Returns `true` if a listener bound to `vm_id` should act on this
    /// frame.
    ///
    /// This is the multiplexing rule that lets many VM-specific listeners
    /// share one group channel: every member receives the transport
    /// frame, but a stamped frame is acted on only by the listener whose
    /// identity matches the stamp. Unstamped frames concern everyone.
    #[must_use]
    pub fn is_for(&self, vm_id: &VmId) -> bool {
        match self {
            Self::Command {
                target_vm: Some(target),
                ..
            } => target == vm_id,
            _ => true,
        }
    }
}
