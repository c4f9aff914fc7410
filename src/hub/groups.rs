//! Group membership tables.
//!
//! [`GroupRegistry`] maps group identifiers to member sets and keeps the
//! reverse map for O(1) cascade cleanup when a connection goes away.
//! Both maps live behind one lock so a concurrent join and dispatch can
//! never observe a torn intermediate state.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::domain::{ConnectionId, GroupId};

/// Forward and reverse membership maps, mutated together under one lock.
#[derive(Debug, Default)]
struct Tables {
    /// group → current members.
    members: HashMap<GroupId, HashSet<ConnectionId>>,
    /// connection → groups it belongs to.
    groups_of: HashMap<ConnectionId, HashSet<GroupId>>,
}

/// Membership store for all groups.
///
/// A group has no explicit lifecycle: it exists exactly as long as it
/// has at least one member. Empty member sets are removed from the
/// table on leave/cascade.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    tables: RwLock<Tables>,
}

impl GroupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a membership pair. Idempotent; returns `true` iff the
    /// connection was not already a member.
    pub async fn join(&self, group_id: &GroupId, connection_id: ConnectionId) -> bool {
        let mut tables = self.tables.write().await;
        let added = tables
            .members
            .entry(group_id.clone())
            .or_default()
            .insert(connection_id);
        tables
            .groups_of
            .entry(connection_id)
            .or_default()
            .insert(group_id.clone());
        added
    }

    /// Removes a membership pair. Idempotent; returns `true` iff the
    /// connection was a member.
    pub async fn leave(&self, group_id: &GroupId, connection_id: ConnectionId) -> bool {
        let mut tables = self.tables.write().await;
        let removed = match tables.members.get_mut(group_id) {
            Some(set) => {
                let removed = set.remove(&connection_id);
                if set.is_empty() {
                    tables.members.remove(group_id);
                }
                removed
            }
            None => false,
        };
        if let Some(groups) = tables.groups_of.get_mut(&connection_id) {
            groups.remove(group_id);
            if groups.is_empty() {
                tables.groups_of.remove(&connection_id);
            }
        }
        removed
    }

    /// Returns a snapshot of the group's current members.
    ///
    /// The copy is taken at call time; dispatchers must not treat it as
    /// live state. A member that leaves between snapshot and send simply
    /// sees the frame dropped at the connection registry.
    pub async fn members_of(&self, group_id: &GroupId) -> Vec<ConnectionId> {
        let tables = self.tables.read().await;
        tables
            .members
            .get(group_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Cascade cleanup on disconnect: removes the connection from every
    /// group it belonged to. Returns the groups it was removed from.
    pub async fn remove_connection(&self, connection_id: ConnectionId) -> Vec<GroupId> {
        let mut tables = self.tables.write().await;
        let Some(groups) = tables.groups_of.remove(&connection_id) else {
            return Vec::new();
        };
        let mut left = Vec::with_capacity(groups.len());
        for group_id in groups {
            if let Some(set) = tables.members.get_mut(&group_id) {
                set.remove(&connection_id);
                if set.is_empty() {
                    tables.members.remove(&group_id);
                }
            }
            left.push(group_id);
        }
        left
    }

    /// Returns the number of currently populated groups.
    pub async fn group_count(&self) -> usize {
        self.tables.read().await.members.len()
    }

    /// Returns the number of members in a group (0 if unpopulated).
    pub async fn member_count(&self, group_id: &GroupId) -> usize {
        self.tables
            .read()
            .await
            .members
            .get(group_id)
            .map_or(0, HashSet::len)
    }
}
