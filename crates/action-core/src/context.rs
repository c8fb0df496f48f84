//! Execution context and transport collaborators
//!
//! Handlers never touch the socket directly. The transport lends each
//! invocation a set of collaborators (emitters for the calling peer, for
//! everyone, and for room-scoped groups, plus a logger) and the pipeline
//! passes them through untouched inside an [`ExecutionContext`]. The context
//! is built per invocation, moved into the handler, and dropped with it.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::logger::{ActionLogger, TracingLogger};
use crate::protocol::RawParam;

/// Emits events toward one or more connected peers.
///
/// Emission is fire-and-forget: delivery failures are the transport's
/// concern, not the handler's.
#[async_trait]
pub trait Emitter: Send + Sync {
    /// Emit an event carrying the given positional values.
    async fn emit(&self, event: &str, values: Vec<Value>);
}

/// Derives emitters scoped to named rooms.
pub trait RoomSelector: Send + Sync {
    /// Emitter reaching every peer tagged with at least one of `rooms`.
    fn select(&self, rooms: &[String]) -> Arc<dyn Emitter>;
}

/// Emitter and selector that drop everything.
///
/// Stands in for the transport when an action runs outside a live
/// connection, such as in unit tests or one-off local invocations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEmitter;

#[async_trait]
impl Emitter for NullEmitter {
    async fn emit(&self, _event: &str, _values: Vec<Value>) {}
}

impl RoomSelector for NullEmitter {
    fn select(&self, _rooms: &[String]) -> Arc<dyn Emitter> {
        Arc::new(NullEmitter)
    }
}

/// Everything a transport hands over for one `execute` call: the raw
/// parameter sequence plus the pass-through collaborators.
pub struct Invocation {
    /// Raw positional parameters. The final element may be the peer's
    /// acknowledgment callback.
    pub params: Vec<RawParam>,
    /// Logger for this invocation.
    pub logger: Arc<dyn ActionLogger>,
    /// Emitter reaching the invoking peer.
    pub client: Arc<dyn Emitter>,
    /// Emitter reaching every connected peer.
    pub all: Arc<dyn Emitter>,
    /// Factory for room-scoped emitters.
    pub rooms: Arc<dyn RoomSelector>,
}

impl Invocation {
    /// Invocation with the given raw parameters and no live transport:
    /// tracing logger, null emitters.
    pub fn detached(params: Vec<RawParam>) -> Self {
        Self {
            params,
            logger: Arc::new(TracingLogger),
            client: Arc::new(NullEmitter),
            all: Arc::new(NullEmitter),
            rooms: Arc::new(NullEmitter),
        }
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Arc<dyn ActionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the emitter reaching the invoking peer.
    pub fn with_client(mut self, client: Arc<dyn Emitter>) -> Self {
        self.client = client;
        self
    }

    /// Replace the emitter reaching every connected peer.
    pub fn with_all(mut self, all: Arc<dyn Emitter>) -> Self {
        self.all = all;
        self
    }

    /// Replace the room-scoped emitter factory.
    pub fn with_rooms(mut self, rooms: Arc<dyn RoomSelector>) -> Self {
        self.rooms = rooms;
        self
    }
}

/// Per-invocation bundle a handler receives: the validated input sequence
/// plus the transport collaborators.
pub struct ExecutionContext {
    /// Validated input values, in positional order. Absent optional tail
    /// positions are simply not present.
    pub input: Vec<Value>,
    /// Logger for this invocation.
    pub logger: Arc<dyn ActionLogger>,
    /// Emitter reaching the invoking peer.
    pub client: Arc<dyn Emitter>,
    /// Emitter reaching every connected peer.
    pub all: Arc<dyn Emitter>,
    rooms: Arc<dyn RoomSelector>,
}

impl ExecutionContext {
    pub(crate) fn new(
        input: Vec<Value>,
        logger: Arc<dyn ActionLogger>,
        client: Arc<dyn Emitter>,
        all: Arc<dyn Emitter>,
        rooms: Arc<dyn RoomSelector>,
    ) -> Self {
        Self {
            input,
            logger,
            client,
            all,
            rooms,
        }
    }

    /// Emitter reaching every peer tagged with at least one of `rooms`.
    pub fn to_rooms<I, S>(&self, rooms: I) -> Arc<dyn Emitter>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rooms: Vec<String> = rooms.into_iter().map(Into::into).collect();
        self.rooms.select(&rooms)
    }
}
