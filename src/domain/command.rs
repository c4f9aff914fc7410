//! The hub command catalog: inbound envelopes and their addressing rules.
//!
//! Every message a client pushes into the hub is one [`HubCommand`]. The
//! catalog is fixed: each kind carries a group identifier plus
//! kind-specific fields, and maps to exactly one [`Addressing`] rule that
//! is established here once and is not configurable per call.

use serde::{Deserialize, Serialize};

use super::connection_id::ConnectionId;
use super::ids::{GroupId, VmId};

/// Inbound envelope sent by an operator or VM agent over its channel.
///
/// Internally tagged on `"method"`. Group-scoped requests aimed at one
/// machine carry a structured [`VmId`] target instead of encoding it into
/// the method name; the hub stamps that target onto the relayed frame and
/// listeners filter on it locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum HubCommand {
    /// Operator asks every listener in the group to report liveness.
    PingRequest {
        /// Target broadcast domain.
        group_id: GroupId,
    },

    /// VM answers a ping directly to the requesting operator.
    PingResponse {
        /// Group the exchange belongs to (informational; targeted
        /// delivery bypasses membership).
        group_id: GroupId,
        /// Connection that issued the originating `ping_request`.
        receiver_id: ConnectionId,
        /// The responding machine.
        vm_id: VmId,
    },

    /// Operator switches the application running on one machine.
    ChangeAppRequest {
        /// Target broadcast domain.
        group_id: GroupId,
        /// Machine that must act on the request.
        vm_id: VmId,
        /// Application to switch the terminal to.
        application_id: String,
    },

    /// VM reports the outcome of a change-app request to the fleet.
    ChangeAppResponse {
        /// Target broadcast domain.
        group_id: GroupId,
        /// The reporting machine.
        vm_id: VmId,
        /// Whether the change succeeded.
        success: bool,
        /// Optional human-readable detail.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Operator installs an application on one machine.
    InstallAppRequest {
        /// Target broadcast domain.
        group_id: GroupId,
        /// Machine that must act on the request.
        vm_id: VmId,
        /// Application to install.
        application_id: String,
    },

    /// VM reports the outcome of an install-app request to the fleet.
    InstallAppResponse {
        /// Target broadcast domain.
        group_id: GroupId,
        /// The reporting machine.
        vm_id: VmId,
        /// Whether the install succeeded.
        success: bool,
        /// Optional human-readable detail.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Operator removes an application from one machine.
    RemoveAppRequest {
        /// Target broadcast domain.
        group_id: GroupId,
        /// Machine that must act on the request.
        vm_id: VmId,
        /// Application to remove.
        application_id: String,
    },

    /// VM reports the outcome of a remove-app request to the fleet.
    RemoveAppResponse {
        /// Target broadcast domain.
        group_id: GroupId,
        /// The reporting machine.
        vm_id: VmId,
        /// Whether the removal succeeded.
        success: bool,
        /// Optional human-readable detail.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Operator rotates the OS user password on one machine.
    ChangeVpsUserPasswordRequest {
        /// Target broadcast domain.
        group_id: GroupId,
        /// Machine that must act on the request.
        vm_id: VmId,
        /// OS account whose password changes.
        username: String,
        /// Replacement password.
        new_password: String,
    },

    /// VM reports the outcome of a password rotation to the fleet.
    ChangeVpsUserPasswordResponse {
        /// Target broadcast domain.
        group_id: GroupId,
        /// The reporting machine.
        vm_id: VmId,
        /// Whether the rotation succeeded.
        success: bool,
        /// Optional human-readable detail.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Caller joins a group; acknowledged with `joined`, advertised to
    /// the other members with `member_joined`.
    JoinGroup {
        /// Group to join.
        group_id: GroupId,
    },

    /// Caller leaves a group; acknowledged with `left`, advertised to
    /// the remaining members with `member_left`.
    LeaveGroup {
        /// Group to leave.
        group_id: GroupId,
    },
}

/// Fixed addressing rule of a command kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// Deliver to every current group member except the sender.
    Broadcast,
    /// Deliver to every current group member except the sender, with the
    /// frame stamped so that only the listener bound to the target
    /// [`VmId`] acts on it.
    VmTargeted,
    /// Deliver to exactly the connection named in the envelope,
    /// bypassing group membership entirely.
    Receiver,
    /// Handled by the hub itself (membership mutation), never relayed.
    Control,
}

/// Discriminator for [`HubCommand`], used as the handler-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// `ping_request`
    PingRequest,
    /// `ping_response`
    PingResponse,
    /// `change_app_request`
    ChangeAppRequest,
    /// `change_app_response`
    ChangeAppResponse,
    /// `install_app_request`
    InstallAppRequest,
    /// `install_app_response`
    InstallAppResponse,
    /// `remove_app_request`
    RemoveAppRequest,
    /// `remove_app_response`
    RemoveAppResponse,
    /// `change_vps_user_password_request`
    ChangeVpsUserPasswordRequest,
    /// `change_vps_user_password_response`
    ChangeVpsUserPasswordResponse,
    /// `join_group`
    JoinGroup,
    /// `leave_group`
    LeaveGroup,
}

impl CommandKind {
    /// Returns the wire method name of this kind.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::PingRequest => "ping_request",
            Self::PingResponse => "ping_response",
            Self::ChangeAppRequest => "change_app_request",
            Self::ChangeAppResponse => "change_app_response",
            Self::InstallAppRequest => "install_app_request",
            Self::InstallAppResponse => "install_app_response",
            Self::RemoveAppRequest => "remove_app_request",
            Self::RemoveAppResponse => "remove_app_response",
            Self::ChangeVpsUserPasswordRequest => "change_vps_user_password_request",
            Self::ChangeVpsUserPasswordResponse => "change_vps_user_password_response",
            Self::JoinGroup => "join_group",
            Self::LeaveGroup => "leave_group",
        }
    }

    /// Returns the fixed addressing rule for this kind.
    #[must_use]
    pub const fn addressing(&self) -> Addressing {
        match self {
            Self::PingRequest
            | Self::ChangeAppResponse
            | Self::InstallAppResponse
            | Self::RemoveAppResponse
            | Self::ChangeVpsUserPasswordResponse => Addressing::Broadcast,
            Self::ChangeAppRequest
            | Self::InstallAppRequest
            | Self::RemoveAppRequest
            | Self::ChangeVpsUserPasswordRequest => Addressing::VmTargeted,
            Self::PingResponse => Addressing::Receiver,
            Self::JoinGroup | Self::LeaveGroup => Addressing::Control,
        }
    }
}

impl HubCommand {
    /// Returns the kind discriminator of this envelope.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::PingRequest { .. } => CommandKind::PingRequest,
            Self::PingResponse { .. } => CommandKind::PingResponse,
            Self::ChangeAppRequest { .. } => CommandKind::ChangeAppRequest,
            Self::ChangeAppResponse { .. } => CommandKind::ChangeAppResponse,
            Self::InstallAppRequest { .. } => CommandKind::InstallAppRequest,
            Self::InstallAppResponse { .. } => CommandKind::InstallAppResponse,
            Self::RemoveAppRequest { .. } => CommandKind::RemoveAppRequest,
            Self::RemoveAppResponse { .. } => CommandKind::RemoveAppResponse,
            Self::ChangeVpsUserPasswordRequest { .. } => CommandKind::ChangeVpsUserPasswordRequest,
            Self::ChangeVpsUserPasswordResponse { .. } => {
                CommandKind::ChangeVpsUserPasswordResponse
            }
            Self::JoinGroup { .. } => CommandKind::JoinGroup,
            Self::LeaveGroup { .. } => CommandKind::LeaveGroup,
        }
    }

    /// Returns the group this envelope is scoped to.
    #[must_use]
    pub fn group_id(&self) -> &GroupId {
        match self {
            Self::PingRequest { group_id }
            | Self::PingResponse { group_id, .. }
            | Self::ChangeAppRequest { group_id, .. }
            | Self::ChangeAppResponse { group_id, .. }
            | Self::InstallAppRequest { group_id, .. }
            | Self::InstallAppResponse { group_id, .. }
            | Self::RemoveAppRequest { group_id, .. }
            | Self::RemoveAppResponse { group_id, .. }
            | Self::ChangeVpsUserPasswordRequest { group_id, .. }
            | Self::ChangeVpsUserPasswordResponse { group_id, .. }
            | Self::JoinGroup { group_id }
            | Self::LeaveGroup { group_id } => group_id,
        }
    }

    /// Returns the machine a vm-targeted request is aimed at, if any.
    ///
    /// `None` for plain broadcasts, responses, targeted responses, and
    /// control commands; only `*_request` kinds aimed at one machine
    /// carry a target.
    #[must_use]
    pub fn target_vm(&self) -> Option<&VmId> {
        match self {
            Self::ChangeAppRequest { vm_id, .. }
            | Self::InstallAppRequest { vm_id, .. }
            | Self::RemoveAppRequest { vm_id, .. }
            | Self::ChangeVpsUserPasswordRequest { vm_id, .. } => Some(vm_id),
            _ => None,
        }
    }

    /// Returns the receiver connection of a targeted response, if any.
    #[must_use]
    pub fn receiver(&self) -> Option<&ConnectionId> {
        match self {
            Self::PingResponse { receiver_id, .. } => Some(receiver_id),
            _ => None,
        }
    }
}
