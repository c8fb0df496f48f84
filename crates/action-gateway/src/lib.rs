//! Runtime-agnostic WebSocket host for socket actions
//!
//! This crate puts an `action-core` registry on the wire. A [`Gateway`]
//! binds a TCP listener, upgrades each connection to WebSocket, and turns
//! every inbound `event` frame into one execute-pipeline invocation:
//! positional params become raw parameters, a client-supplied `ack` id
//! becomes the trailing acknowledgment callback, and the connection table
//! backs the emitters handlers reach peers through.
//!
//! # Architecture
//!
//! The gateway works with any async runtime (tokio, async-std, smol). It
//! uses:
//!
//! - `async-tungstenite` for WebSocket support (without runtime features)
//! - `async-net` for networking
//! - `futures` channels for per-connection outbound queues
//!
//! # Example
//!
//! ```no_run
//! use action_core::{Action, ActionRegistry, ElementRule, TupleSchema};
//! use action_gateway::{Gateway, GatewayConfig};
//!
//! # async fn example() -> action_gateway::Result<()> {
//! let mut registry = ActionRegistry::new();
//! registry.register(
//!     Action::builder("echo")
//!         .input(TupleSchema::new(vec![ElementRule::string()]))
//!         .output(TupleSchema::new(vec![ElementRule::string()]))
//!         .handler(|ctx| async move { Ok(ctx.input) }),
//! )?;
//!
//! let gateway = Gateway::bind(&GatewayConfig::default(), registry).await?;
//!
//! // Accept connections - runtime agnostic
//! loop {
//!     let handler = gateway.accept().await?;
//!     // User chooses how to run the handler
//!     // e.g., tokio::spawn, smol::spawn, etc.
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod connection;
mod emitter;
pub mod error;
pub mod frame;
pub mod server;

pub use config::{ConfigError, GatewayConfig};
pub use connection::{ConnectionInfo, ConnectionTable};
pub use error::{Error, Result};
pub use frame::Frame;
pub use server::{ConnectionHandler, Gateway};

/// Re-export key types for convenience
pub mod prelude {
    pub use crate::{ConnectionHandler, Frame, Gateway, GatewayConfig};

    pub use action_core::prelude::*;
}
