//! Error types for the gateway

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Gateway error type
#[derive(Error, Debug)]
pub enum Error {
    /// Action pipeline or registry failure
    #[error("Action error: {0}")]
    Action(#[from] action_core::Error),

    /// WebSocket protocol failure
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// Network I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration failure
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
