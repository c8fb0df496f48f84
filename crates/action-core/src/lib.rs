//! Action Core Library
//!
//! Declarative, validated event handlers for persistent socket connections.
//! An [`Action`] binds an event name (scoped by a namespace) to an input
//! shape, an optional output shape, and an asynchronous handler; its
//! `execute` pipeline validates incoming positional parameters, invokes the
//! handler with a normalized [`ExecutionContext`], validates the handler's
//! output, and delivers it through the peer's acknowledgment callback.
//!
//! The crate is transport- and runtime-agnostic: a transport supplies each
//! invocation's raw parameters and collaborators (emitters, logger) through
//! an [`Invocation`], and everything else is plain `futures`-style async.
//! Failures are first-class: malformed input, a failing handler, malformed
//! output, and a misplaced acknowledgment callback each surface as their own
//! [`Error`] kind, logged exactly once and never acknowledged.

#![warn(missing_docs)]

pub mod action;
pub mod adapter;
pub mod context;
pub mod error;
pub mod logger;
pub mod protocol;
pub mod registry;

pub use action::{Action, ActionBuilder, Handler, HandlerFuture, ROOT_NAMESPACE};
pub use adapter::{SchemaAdapter, TupleParser};
pub use context::{Emitter, ExecutionContext, Invocation, NullEmitter, RoomSelector};
pub use error::{Error, Result};
pub use logger::{ActionLogger, TracingLogger};
pub use protocol::{AckCallback, MisplacedCallback, RawParam, SplitParams, split_params};
pub use registry::{ActionInfo, ActionRegistry};

// Re-export the schema types actions are declared with
pub use tuple_schema::{ElementRule, Issues, TupleSchema};

/// Convenience prelude for action-core users
pub mod prelude {
    pub use crate::action::{Action, ActionBuilder, ROOT_NAMESPACE};
    pub use crate::context::{Emitter, ExecutionContext, Invocation, RoomSelector};
    pub use crate::error::{Error, Result};
    pub use crate::logger::{ActionLogger, TracingLogger};
    pub use crate::protocol::{AckCallback, RawParam};
    pub use crate::registry::{ActionInfo, ActionRegistry};

    // Re-export commonly used types from dependencies
    pub use async_trait::async_trait;
    pub use serde_json::{Value, json};
    pub use tuple_schema::{ElementRule, TupleSchema};
}
