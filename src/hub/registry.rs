//! Connection table: the set of live channels and their outbound queues.
//!
//! [`ConnectionRegistry`] owns all connection state. Each entry maps a
//! [`ConnectionId`] to the bounded mpsc sender feeding that connection's
//! session task, which performs the actual socket writes. Nothing outside
//! this registry stores connection state beyond the identifier.

use std::collections::HashMap;

use tokio::sync::{RwLock, mpsc};

use crate::domain::{ConnectionId, ServerFrame};

/// Central store for live connections.
///
/// Uses a `RwLock<HashMap<...>>` so that concurrent dispatches (reads)
/// proceed in parallel and registration/removal (writes) serialize with
/// them. Senders are cloned out under the read lock and used after it is
/// released, so no lock is held across a send.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, mpsc::Sender<ServerFrame>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly established channel and returns its fresh
    /// identifier. Never fails.
    pub async fn register(&self, sender: mpsc::Sender<ServerFrame>) -> ConnectionId {
        let id = ConnectionId::new();
        self.connections.write().await.insert(id, sender);
        id
    }

    /// Removes a connection. Idempotent; returns `true` if the entry
    /// existed. Safe to call concurrently with in-flight dispatches to
    /// the same id, which become silent no-ops.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        self.connections.write().await.remove(&id).is_some()
    }

    /// Returns `true` if the connection is currently registered.
    pub async fn is_live(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    /// Enqueues a frame to one connection, best effort.
    ///
    /// Returns `true` only if the frame was accepted onto the
    /// connection's outbound queue. An unknown id, a closed queue
    /// (session already torn down), or a full queue (slow client) all
    /// drop the frame silently. Delivery carries no confirmation
    /// signal beyond the return value, which callers use for logging
    /// only.
    pub async fn send(&self, id: ConnectionId, frame: ServerFrame) -> bool {
        let sender = {
            let map = self.connections.read().await;
            map.get(&id).cloned()
        };
        let Some(sender) = sender else {
            return false;
        };
        match sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(connection_id = %id, "outbound queue full, frame dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    /// Returns the number of live connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connections are registered.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}
