//! Registry of connected live-reload clients.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::dev::Notification;

/// Identifier handed out on registration.
pub type ClientId = u64;

/// Messages buffered per client before it counts as lagging.
const CLIENT_BUFFER: usize = 16;

/// Connected clients, keyed by id. Cheap to clone; clones share membership.
///
/// Each client owns the receiving half of a channel; its socket task drains
/// that channel. Broadcast never awaits, so a slow tab cannot hold up others.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: Arc<RwLock<HashMap<ClientId, mpsc::Sender<String>>>>,
    next_id: Arc<AtomicU64>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client, returning its id and the stream of wire messages for it.
    pub fn register(&self) -> (ClientId, mpsc::Receiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);
        (id, rx)
    }

    /// Remove a client. Unknown or already-removed ids are ignored.
    pub fn unregister(&self, id: ClientId) -> bool {
        self.clients.write().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }

    /// Deliver `message` to every client, returning how many accepted it.
    ///
    /// Iterates a snapshot of the membership. A client whose channel is closed
    /// is removed; a client whose buffer is full misses this message.
    pub fn broadcast(&self, message: &Notification) -> usize {
        let wire = message.to_wire();
        let snapshot: Vec<(ClientId, mpsc::Sender<String>)> = self
            .clients
            .read()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut delivered = 0;
        let mut closed = Vec::new();
        for (id, tx) in snapshot {
            match tx.try_send(wire.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Closed(_)) => closed.push(id),
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(client = id, "live-reload client is lagging, message dropped");
                }
            }
        }

        for id in closed {
            self.unregister(id);
            tracing::debug!(client = id, "removed disconnected live-reload client");
        }

        delivered
    }

    /// Broadcast each notification in order.
    pub fn broadcast_all(&self, messages: &[Notification]) {
        for message in messages {
            let delivered = self.broadcast(message);
            tracing::debug!(delivered, message = %message.to_wire(), "notification sent");
        }
    }
}
