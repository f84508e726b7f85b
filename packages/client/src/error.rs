//! Error types for the probe client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Unusable REPL input
    #[error("{0}")]
    InvalidCommand(String),
}
