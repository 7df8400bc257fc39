//! Client error type

use thiserror::Error;

/// Errors raised by a store client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// A response was read before the round-trip that resolves it
    #[error("response read before the pipeline was synced")]
    Unresolved,

    /// The store answered this one operation with an error reply
    #[error("error reply: {0}")]
    Reply(String),

    /// The round-trip itself failed (connection, protocol, server)
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ClientError {
    /// True if the whole round-trip failed rather than a single operation.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}
