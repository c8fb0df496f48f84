//! WebSocket gateway server
//!
//! [`Gateway`] binds the listener and owns the shared pieces: the action
//! registry and the connection table. Accepting yields one
//! [`ConnectionHandler`] per peer; the caller decides how to run it
//! (`smol::spawn`, `tokio::spawn`, inline), keeping the crate
//! runtime-agnostic.
//!
//! Each handler drives a single select loop per connection: outbound frames
//! (acknowledgments and emits, queued by any task) are forwarded to the
//! socket, and inbound `event` frames are dispatched through the registry's
//! execute pipeline.

use async_net::{TcpListener, TcpStream};
use async_tungstenite::{WebSocketStream, accept_async};
use chrono::Utc;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tungstenite::Message;
use uuid::Uuid;

use action_core::context::Invocation;
use action_core::logger::TracingLogger;
use action_core::protocol::{AckCallback, RawParam};
use action_core::registry::ActionRegistry;

use crate::config::GatewayConfig;
use crate::connection::{ConnectionEntry, ConnectionTable};
use crate::emitter::{BroadcastEmitter, ClientEmitter, RoomEmitter, TableSelector};
use crate::error::Result;
use crate::frame::Frame;

/// WebSocket gateway serving a registry of actions
pub struct Gateway {
    registry: Arc<ActionRegistry>,
    table: Arc<ConnectionTable>,
    /// The TCP listener
    pub listener: TcpListener,
}

impl Gateway {
    /// Validate the configuration and bind the listener.
    ///
    /// The registry is fixed from here on; register every action before
    /// binding.
    pub async fn bind(config: &GatewayConfig, registry: ActionRegistry) -> Result<Self> {
        config.validate()?;
        let listener = TcpListener::bind(config.listen.as_str()).await?;
        info!(
            "Gateway listening on {} with {} action(s)",
            config.listen,
            registry.len()
        );

        Ok(Self {
            registry: Arc::new(registry),
            table: Arc::new(ConnectionTable::new()),
            listener,
        })
    }

    /// Address the listener actually bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept one connection and hand back its handler.
    pub async fn accept(&self) -> Result<ConnectionHandler> {
        let (tcp_stream, addr) = self.listener.accept().await?;
        let ws = accept_async(tcp_stream).await?;

        let id = Uuid::new_v4();
        let (outbound_tx, outbound) = mpsc::unbounded();
        self.table
            .insert(
                id,
                ConnectionEntry {
                    outbound: outbound_tx.clone(),
                    rooms: HashSet::new(),
                    addr,
                    connected_at: Utc::now(),
                },
            )
            .await;

        debug!("New connection {} from {}", id, addr);

        Ok(ConnectionHandler {
            id,
            addr,
            ws,
            outbound,
            outbound_tx,
            registry: self.registry.clone(),
            table: self.table.clone(),
        })
    }

    /// Registry serving this gateway.
    pub fn registry(&self) -> &Arc<ActionRegistry> {
        &self.registry
    }

    /// Live connection table.
    pub fn connections(&self) -> &Arc<ConnectionTable> {
        &self.table
    }

    /// Emit an event to every live connection, outside any invocation.
    pub async fn emit_all(&self, namespace: &str, event: &str, values: Vec<Value>) {
        use action_core::context::Emitter;

        BroadcastEmitter {
            table: self.table.clone(),
            namespace: namespace.to_string(),
        }
        .emit(event, values)
        .await;
    }

    /// Emit an event to every connection tagged with at least one of
    /// `rooms`, outside any invocation.
    pub async fn emit_to_rooms(
        &self,
        rooms: &[String],
        namespace: &str,
        event: &str,
        values: Vec<Value>,
    ) {
        use action_core::context::Emitter;

        RoomEmitter {
            table: self.table.clone(),
            namespace: namespace.to_string(),
            rooms: rooms.to_vec(),
        }
        .emit(event, values)
        .await;
    }
}

/// Handles one accepted connection until it closes
pub struct ConnectionHandler {
    id: Uuid,
    addr: SocketAddr,
    ws: WebSocketStream<TcpStream>,
    outbound: UnboundedReceiver<Frame>,
    outbound_tx: UnboundedSender<Frame>,
    registry: Arc<ActionRegistry>,
    table: Arc<ConnectionTable>,
}

impl ConnectionHandler {
    /// Connection id, as listed in the gateway's connection table.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Peer address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Drive the connection until the peer disconnects.
    pub async fn handle(mut self) -> Result<()> {
        info!("Handling connection {} from {}", self.id, self.addr);

        let result = self.run().await;

        self.table.remove(self.id).await;
        info!("Connection {} from {} closed", self.id, self.addr);
        result
    }

    async fn run(&mut self) -> Result<()> {
        loop {
            futures::select! {
                // Outbound frames queued by acknowledgments and emitters
                frame = self.outbound.next() => {
                    match frame {
                        Some(frame) => {
                            let json = serde_json::to_string(&frame)?;
                            self.ws.send(Message::Text(json.into())).await?;
                        }
                        None => break,
                    }
                }

                // Inbound traffic from the peer
                msg = self.ws.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.process_text(&text).await;
                        }
                        Some(Ok(Message::Ping(data))) => {
                            self.ws.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Close(_))) => {
                            debug!("Connection {} closing", self.id);
                            break;
                        }
                        Some(Ok(_)) => {
                            // Ignore binary and pong frames
                        }
                        Some(Err(e)) => {
                            error!("WebSocket error on connection {}: {}", self.id, e);
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        Ok(())
    }

    async fn process_text(&self, text: &str) {
        let frame: Frame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Connection {} sent a malformed frame: {}", self.id, e);
                return;
            }
        };

        match frame {
            Frame::Event {
                namespace,
                event,
                params,
                ack,
            } => {
                self.dispatch_event(namespace, event, params, ack).await;
            }
            Frame::Ack { .. } | Frame::Emit { .. } => {
                warn!("Connection {} sent a server-only frame", self.id);
            }
        }
    }

    async fn dispatch_event(
        &self,
        namespace: String,
        event: String,
        params: Vec<Value>,
        ack: Option<u64>,
    ) {
        let mut raw: Vec<RawParam> = params.into_iter().map(RawParam::Data).collect();
        if let Some(id) = ack {
            raw.push(RawParam::Callback(self.ack_callback(id)));
        }

        let invocation = Invocation {
            params: raw,
            logger: Arc::new(TracingLogger),
            client: Arc::new(ClientEmitter {
                table: self.table.clone(),
                id: self.id,
                namespace: namespace.clone(),
            }),
            all: Arc::new(BroadcastEmitter {
                table: self.table.clone(),
                namespace: namespace.clone(),
            }),
            rooms: Arc::new(TableSelector {
                table: self.table.clone(),
                namespace: namespace.clone(),
            }),
        };

        match self.registry.dispatch(&namespace, &event, invocation).await {
            Ok(()) => {}
            Err(err @ action_core::Error::ActionNotFound { .. }) => {
                warn!("Connection {}: {}", self.id, err);
            }
            Err(err) => {
                // The pipeline already reported this through the invocation
                // logger; the connection stays up.
                debug!("Connection {}: {}", self.id, err);
            }
        }
    }

    fn ack_callback(&self, ack: u64) -> AckCallback {
        let sender = self.outbound_tx.clone();
        let connection = self.id;
        AckCallback::new(move |values| {
            if sender.unbounded_send(Frame::Ack { ack, values }).is_err() {
                debug!(
                    "Connection {} closed before acknowledgment {}",
                    connection, ack
                );
            }
        })
    }
}
