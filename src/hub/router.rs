//! The hub: envelope routing over the connection and group registries.
//!
//! [`Hub`] resolves each inbound [`HubCommand`] to its delivery set per
//! the catalog's addressing rule and enqueues a relay frame to every
//! resolved, still-live connection. Delivery is fire-and-forget: no
//! retries, no acknowledgements, and no signal back to the sender.
//! Callers that need confirmation must build it above this layer.

use tokio::sync::mpsc;

use super::groups::GroupRegistry;
use super::registry::ConnectionRegistry;
use crate::domain::{Addressing, ConnectionId, GroupId, HubCommand, ServerFrame};

/// Live counters for the stats surface.
#[derive(Debug, Clone, Copy)]
pub struct HubStats {
    /// Number of registered connections.
    pub connections: usize,
    /// Number of currently populated groups.
    pub groups: usize,
}

/// Process-wide hub over all fleets.
///
/// Owns the connection table and the membership tables; both are
/// internally synchronized, so the hub is shared as a plain `Arc<Hub>`
/// and every operation takes `&self`. Unrelated fleets never contend
/// beyond the brief table locks: there is no global sequencing of
/// dispatches.
#[derive(Debug, Default)]
pub struct Hub {
    connections: ConnectionRegistry,
    groups: GroupRegistry,
}

impl Hub {
    /// Creates a hub with empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly established channel. Never fails.
    pub async fn connect(&self, sender: mpsc::Sender<ServerFrame>) -> ConnectionId {
        let id = self.connections.register(sender).await;
        tracing::info!(connection_id = %id, "connection established");
        id
    }

    /// Tears down a connection: cascade-removes its memberships, then
    /// unregisters it. Idempotent. The cascade is silent; no departure
    /// notices are emitted on disconnect.
    pub async fn disconnect(&self, id: ConnectionId) {
        let left = self.groups.remove_connection(id).await;
        self.connections.unregister(id).await;
        tracing::info!(connection_id = %id, groups_left = left.len(), "connection closed");
    }

    /// Returns `true` if the connection is currently registered.
    pub async fn is_live(&self, id: ConnectionId) -> bool {
        self.connections.is_live(id).await
    }

    /// Handles one inbound envelope from `sender`.
    ///
    /// Control commands mutate membership; everything else is routed per
    /// its addressing rule. Per-recipient failures are isolated and
    /// never surface to the caller.
    pub async fn dispatch(&self, sender: ConnectionId, command: HubCommand) {
        match command {
            HubCommand::JoinGroup { group_id } => self.join_group(sender, group_id).await,
            HubCommand::LeaveGroup { group_id } => self.leave_group(sender, group_id).await,
            command => self.route(sender, command).await,
        }
    }

    /// Adds `sender` to the group, acknowledges the caller, and advises
    /// the other members. Membership add is idempotent; the
    /// notifications are advisory and always emitted, as a re-join is
    /// indistinguishable from a first join to the caller.
    pub async fn join_group(&self, sender: ConnectionId, group_id: GroupId) {
        self.groups.join(&group_id, sender).await;
        tracing::debug!(connection_id = %sender, group_id = %group_id, "joined group");

        self.connections
            .send(
                sender,
                ServerFrame::Joined {
                    group_id: group_id.clone(),
                },
            )
            .await;

        let notice = ServerFrame::MemberJoined {
            group_id: group_id.clone(),
            connection_id: sender,
        };
        for member in self.groups.members_of(&group_id).await {
            if member != sender {
                self.connections.send(member, notice.clone()).await;
            }
        }
    }

    /// Removes `sender` from the group, acknowledges the caller, and
    /// advises the remaining members.
    pub async fn leave_group(&self, sender: ConnectionId, group_id: GroupId) {
        self.groups.leave(&group_id, sender).await;
        tracing::debug!(connection_id = %sender, group_id = %group_id, "left group");

        self.connections
            .send(
                sender,
                ServerFrame::Left {
                    group_id: group_id.clone(),
                },
            )
            .await;

        let notice = ServerFrame::MemberLeft {
            group_id: group_id.clone(),
            connection_id: sender,
        };
        for member in self.groups.members_of(&group_id).await {
            self.connections.send(member, notice.clone()).await;
        }
    }

    /// Routes a non-control envelope to its delivery set.
    async fn route(&self, sender: ConnectionId, command: HubCommand) {
        match command.kind().addressing() {
            Addressing::Receiver => {
                // Targeted delivery bypasses membership entirely; the
                // receiver may already be gone, which is a silent no-op.
                let Some(receiver) = command.receiver().copied() else {
                    return;
                };
                let delivered = self
                    .connections
                    .send(receiver, ServerFrame::relay(sender, command))
                    .await;
                if !delivered {
                    tracing::debug!(connection_id = %receiver, "targeted receiver gone, response dropped");
                }
            }
            Addressing::Broadcast | Addressing::VmTargeted => {
                let members = self.groups.members_of(command.group_id()).await;
                let frame = ServerFrame::relay(sender, command);
                for member in members {
                    if member != sender {
                        self.connections.send(member, frame.clone()).await;
                    }
                }
            }
            // Control kinds are consumed by `dispatch` before routing.
            Addressing::Control => {}
        }
    }

    /// Returns a snapshot of the group's current members.
    pub async fn group_members(&self, group_id: &GroupId) -> Vec<ConnectionId> {
        self.groups.members_of(group_id).await
    }

    /// Returns live hub counters.
    pub async fn stats(&self) -> HubStats {
        HubStats {
            connections: self.connections.len().await,
            groups: self.groups.group_count().await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::VmId;

    /// Registers a fake connection and returns its id plus the frame
    /// queue a real session task would drain.
    async fn connect(hub: &Hub) -> (ConnectionId, mpsc::Receiver<ServerFrame>) {
        let (tx, rx) = mpsc::channel(16);
        (hub.connect(tx).await, rx)
    }

    fn drain(rx: &mut mpsc::Receiver<ServerFrame>) -> Vec<ServerFrame> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    fn ping(group: &str) -> HubCommand {
        HubCommand::PingRequest {
            group_id: GroupId::from(group),
        }
    }

    fn change_app(group: &str, vm: &str) -> HubCommand {
        HubCommand::ChangeAppRequest {
            group_id: GroupId::from(group),
            vm_id: VmId::from(vm),
            application_id: "mt5-terminal".to_string(),
        }
    }

    async fn join(hub: &Hub, id: ConnectionId, group: &str) {
        hub.dispatch(
            id,
            HubCommand::JoinGroup {
                group_id: GroupId::from(group),
            },
        )
        .await;
    }

    #[tokio::test]
    async fn broadcast_excludes_sender() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        let (c, mut rx_c) = connect(&hub).await;
        for id in [a, b, c] {
            join(&hub, id, "fleetA").await;
        }
        drain(&mut rx_a);
        drain(&mut rx_b);
        drain(&mut rx_c);

        hub.dispatch(a, ping("fleetA")).await;

        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(drain(&mut rx_b).len(), 1);
        assert_eq!(drain(&mut rx_c).len(), 1);
    }

    #[tokio::test]
    async fn targeted_response_bypasses_membership() {
        let hub = Hub::new();
        let (a, _rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        // a and b share no group.

        hub.dispatch(
            a,
            HubCommand::PingResponse {
                group_id: GroupId::from("fleetA"),
                receiver_id: b,
                vm_id: VmId::from("vm-1"),
            },
        )
        .await;

        let frames = drain(&mut rx_b);
        let [ServerFrame::Command { sender, .. }] = frames.as_slice() else {
            panic!("expected exactly one relayed command");
        };
        assert_eq!(*sender, a);
    }

    #[tokio::test]
    async fn targeted_response_to_dead_receiver_is_noop() {
        let hub = Hub::new();
        let (a, _rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;
        hub.disconnect(b).await;

        // Must not panic or error.
        hub.dispatch(
            a,
            HubCommand::PingResponse {
                group_id: GroupId::from("fleetA"),
                receiver_id: b,
                vm_id: VmId::from("vm-1"),
            },
        )
        .await;
    }

    #[tokio::test]
    async fn broadcast_to_empty_group_is_noop() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        join(&hub, a, "fleetA").await;
        drain(&mut rx_a);

        hub.dispatch(a, ping("fleetA")).await;
        assert!(drain(&mut rx_a).is_empty());
    }

    #[tokio::test]
    async fn leave_removes_from_future_broadcasts() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        join(&hub, a, "fleetA").await;
        join(&hub, b, "fleetA").await;
        hub.dispatch(
            b,
            HubCommand::LeaveGroup {
                group_id: GroupId::from("fleetA"),
            },
        )
        .await;
        drain(&mut rx_a);
        drain(&mut rx_b);

        hub.dispatch(a, ping("fleetA")).await;
        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn disconnect_cascades_and_skips_delivery() {
        let hub = Hub::new();
        let (op1, mut rx_op1) = connect(&hub).await;
        let (vm1, mut rx_vm1) = connect(&hub).await;
        let (vm2, mut rx_vm2) = connect(&hub).await;
        for id in [op1, vm1, vm2] {
            join(&hub, id, "fleetA").await;
        }
        drain(&mut rx_op1);
        drain(&mut rx_vm1);
        drain(&mut rx_vm2);

        hub.disconnect(vm1).await;
        assert!(!hub.is_live(vm1).await);

        hub.dispatch(op1, ping("fleetA")).await;
        assert!(drain(&mut rx_vm1).is_empty());
        assert_eq!(drain(&mut rx_vm2).len(), 1);
        assert_eq!(hub.stats().await.connections, 2);
    }

    #[tokio::test]
    async fn vm_targeted_request_reaches_group_but_only_target_acts() {
        let hub = Hub::new();
        let (op1, mut rx_op1) = connect(&hub).await;
        let (vm1, mut rx_vm1) = connect(&hub).await;
        let (vm2, mut rx_vm2) = connect(&hub).await;
        for id in [op1, vm1, vm2] {
            join(&hub, id, "fleetA").await;
        }
        drain(&mut rx_op1);
        drain(&mut rx_vm1);
        drain(&mut rx_vm2);

        hub.dispatch(op1, change_app("fleetA", "vm-1")).await;

        // Both machines receive the transport frame.
        let to_vm1 = drain(&mut rx_vm1);
        let to_vm2 = drain(&mut rx_vm2);
        let ([frame_vm1], [frame_vm2]) = (to_vm1.as_slice(), to_vm2.as_slice()) else {
            panic!("expected one frame per machine");
        };

        // But only the listener bound to "vm-1" acts on it.
        assert!(frame_vm1.is_for(&VmId::from("vm-1")));
        assert!(!frame_vm2.is_for(&VmId::from("vm-2")));
        assert!(drain(&mut rx_op1).is_empty());
    }

    #[tokio::test]
    async fn response_broadcast_excludes_responding_vm() {
        let hub = Hub::new();
        let (op1, mut rx_op1) = connect(&hub).await;
        let (vm1, mut rx_vm1) = connect(&hub).await;
        let (vm2, mut rx_vm2) = connect(&hub).await;
        for id in [op1, vm1, vm2] {
            join(&hub, id, "fleetA").await;
        }
        drain(&mut rx_op1);
        drain(&mut rx_vm1);
        drain(&mut rx_vm2);

        hub.dispatch(
            vm1,
            HubCommand::ChangeAppResponse {
                group_id: GroupId::from("fleetA"),
                vm_id: VmId::from("vm-1"),
                success: true,
                message: None,
            },
        )
        .await;

        assert_eq!(drain(&mut rx_op1).len(), 1);
        assert_eq!(drain(&mut rx_vm2).len(), 1);
        assert!(drain(&mut rx_vm1).is_empty());
    }

    #[tokio::test]
    async fn join_acknowledges_caller_and_advises_members() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        join(&hub, a, "fleetA").await;
        drain(&mut rx_a);

        join(&hub, b, "fleetA").await;

        let to_b = drain(&mut rx_b);
        assert!(matches!(to_b.as_slice(), [ServerFrame::Joined { .. }]));

        let to_a = drain(&mut rx_a);
        let [ServerFrame::MemberJoined { connection_id, .. }] = to_a.as_slice() else {
            panic!("expected a member_joined notice");
        };
        assert_eq!(*connection_id, b);
    }

    #[tokio::test]
    async fn leave_acknowledges_caller_and_advises_remaining() {
        let hub = Hub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;
        join(&hub, a, "fleetA").await;
        join(&hub, b, "fleetA").await;
        drain(&mut rx_a);
        drain(&mut rx_b);

        hub.dispatch(
            b,
            HubCommand::LeaveGroup {
                group_id: GroupId::from("fleetA"),
            },
        )
        .await;

        let to_b = drain(&mut rx_b);
        assert!(matches!(to_b.as_slice(), [ServerFrame::Left { .. }]));

        let to_a = drain(&mut rx_a);
        let [ServerFrame::MemberLeft { connection_id, .. }] = to_a.as_slice() else {
            panic!("expected a member_left notice");
        };
        assert_eq!(*connection_id, b);
    }

    #[tokio::test]
    async fn stats_track_connections_and_groups() {
        let hub = Hub::new();
        let (a, _rx_a) = connect(&hub).await;
        let (b, _rx_b) = connect(&hub).await;
        join(&hub, a, "fleetA").await;
        join(&hub, b, "fleetB").await;

        let stats = hub.stats().await;
        assert_eq!(stats.connections, 2);
        assert_eq!(stats.groups, 2);

        hub.disconnect(a).await;
        let stats = hub.stats().await;
        assert_eq!(stats.connections, 1);
        assert_eq!(stats.groups, 1);
    }
}
