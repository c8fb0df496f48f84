//! Live connection bookkeeping
//!
//! The gateway tracks every accepted connection in a [`ConnectionTable`]:
//! the outbound frame channel feeding its socket, the rooms it is tagged
//! with, and when it arrived. Emitters resolve their targets against the
//! table at emit time, so a peer that disconnected mid-handler is simply
//! skipped.

use chrono::{DateTime, Utc};
use futures::channel::mpsc::UnboundedSender;
use futures::lock::Mutex;
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use uuid::Uuid;

use crate::frame::Frame;

/// Bookkeeping for one live connection.
pub(crate) struct ConnectionEntry {
    pub(crate) outbound: UnboundedSender<Frame>,
    pub(crate) rooms: HashSet<String>,
    pub(crate) addr: SocketAddr,
    pub(crate) connected_at: DateTime<Utc>,
}

/// Snapshot of one live connection.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    /// Connection id
    pub id: Uuid,
    /// Peer address
    pub addr: SocketAddr,
    /// Room tags, sorted for stable listings
    pub rooms: Vec<String>,
    /// When the connection was accepted
    pub connected_at: DateTime<Utc>,
}

/// Table of live connections shared by the gateway, its handlers, and its
/// emitters.
pub struct ConnectionTable {
    entries: Mutex<HashMap<Uuid, ConnectionEntry>>,
}

impl ConnectionTable {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn insert(&self, id: Uuid, entry: ConnectionEntry) {
        self.entries.lock().await.insert(id, entry);
    }

    pub(crate) async fn remove(&self, id: Uuid) {
        self.entries.lock().await.remove(&id);
    }

    /// Replace the room tags for a connection.
    ///
    /// Returns false when the connection is no longer live.
    pub async fn set_rooms<I, S>(&self, id: Uuid, rooms: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(&id) {
            Some(entry) => {
                entry.rooms = rooms.into_iter().map(Into::into).collect();
                true
            }
            None => false,
        }
    }

    /// Number of live connections.
    pub async fn count(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Snapshot every live connection.
    pub async fn list(&self) -> Vec<ConnectionInfo> {
        self.entries
            .lock()
            .await
            .iter()
            .map(|(id, entry)| {
                let mut rooms: Vec<String> = entry.rooms.iter().cloned().collect();
                rooms.sort();
                ConnectionInfo {
                    id: *id,
                    addr: entry.addr,
                    rooms,
                    connected_at: entry.connected_at,
                }
            })
            .collect()
    }

    pub(crate) async fn sender(&self, id: Uuid) -> Option<UnboundedSender<Frame>> {
        self.entries
            .lock()
            .await
            .get(&id)
            .map(|entry| entry.outbound.clone())
    }

    pub(crate) async fn senders_all(&self) -> Vec<UnboundedSender<Frame>> {
        self.entries
            .lock()
            .await
            .values()
            .map(|entry| entry.outbound.clone())
            .collect()
    }

    pub(crate) async fn senders_in_rooms(&self, rooms: &[String]) -> Vec<UnboundedSender<Frame>> {
        self.entries
            .lock()
            .await
            .values()
            .filter(|entry| rooms.iter().any(|room| entry.rooms.contains(room)))
            .map(|entry| entry.outbound.clone())
            .collect()
    }
}
