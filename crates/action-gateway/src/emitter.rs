//! Emitter implementations over the connection table
//!
//! Handlers see these only as `dyn Emitter`. Each one resolves its targets
//! against the live connection table at emit time and queues an `emit` frame
//! on every matching outbound channel. Emission is fire-and-forget: a closed
//! channel means the peer is gone, which is traced and otherwise ignored.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use action_core::context::{Emitter, RoomSelector};

use crate::connection::ConnectionTable;
use crate::frame::Frame;

fn emit_frame(namespace: &str, event: &str, values: Vec<Value>) -> Frame {
    Frame::Emit {
        namespace: namespace.to_string(),
        event: event.to_string(),
        params: values,
    }
}

/// Emitter reaching the single invoking connection.
pub(crate) struct ClientEmitter {
    pub(crate) table: Arc<ConnectionTable>,
    pub(crate) id: Uuid,
    pub(crate) namespace: String,
}

#[async_trait]
impl Emitter for ClientEmitter {
    async fn emit(&self, event: &str, values: Vec<Value>) {
        let Some(sender) = self.table.sender(self.id).await else {
            debug!("Connection {} is gone, dropping '{}'", self.id, event);
            return;
        };
        if sender
            .unbounded_send(emit_frame(&self.namespace, event, values))
            .is_err()
        {
            debug!("Connection {} closed, dropping '{}'", self.id, event);
        }
    }
}

/// Emitter reaching every live connection.
pub(crate) struct BroadcastEmitter {
    pub(crate) table: Arc<ConnectionTable>,
    pub(crate) namespace: String,
}

#[async_trait]
impl Emitter for BroadcastEmitter {
    async fn emit(&self, event: &str, values: Vec<Value>) {
        let frame = emit_frame(&self.namespace, event, values);
        for sender in self.table.senders_all().await {
            if sender.unbounded_send(frame.clone()).is_err() {
                debug!("Skipping closed connection while broadcasting '{}'", event);
            }
        }
    }
}

/// Emitter reaching every connection tagged with at least one of a fixed
/// set of rooms.
pub(crate) struct RoomEmitter {
    pub(crate) table: Arc<ConnectionTable>,
    pub(crate) namespace: String,
    pub(crate) rooms: Vec<String>,
}

#[async_trait]
impl Emitter for RoomEmitter {
    async fn emit(&self, event: &str, values: Vec<Value>) {
        let frame = emit_frame(&self.namespace, event, values);
        for sender in self.table.senders_in_rooms(&self.rooms).await {
            if sender.unbounded_send(frame.clone()).is_err() {
                debug!(
                    "Skipping closed connection while emitting '{}' to rooms {:?}",
                    event, self.rooms
                );
            }
        }
    }
}

/// Room-scoped emitter factory handed to handlers.
pub(crate) struct TableSelector {
    pub(crate) table: Arc<ConnectionTable>,
    pub(crate) namespace: String,
}

impl RoomSelector for TableSelector {
    fn select(&self, rooms: &[String]) -> Arc<dyn Emitter> {
        Arc::new(RoomEmitter {
            table: self.table.clone(),
            namespace: self.namespace.clone(),
            rooms: rooms.to_vec(),
        })
    }
}
