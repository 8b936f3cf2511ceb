//! Error types for the chat client.

use thiserror::Error;

use crate::domain::{ApiError, ChannelError, DomainError};

/// Client errors
///
/// Nothing sits above the session to handle these, so the session logs them
/// where they happen and returns them for the runner and for tests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Login or compose input was rejected
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    /// Messaging channel error
    #[error("connection error: {0}")]
    Connection(#[from] ChannelError),

    /// REST backend error
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Inbound frame body is not a chat event
    #[error("malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),

    /// Inbound event belongs to another room
    #[error("event for room '{event_room}' received in room '{session_room}'")]
    ForeignRoom {
        event_room: String,
        session_room: String,
    },

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Local I/O error (transcript output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
