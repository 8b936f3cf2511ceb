//! Domain-level error types.

use thiserror::Error;

/// Validation errors for user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// User name is empty or whitespace only
    #[error("user name must not be empty")]
    EmptyUserName,

    /// Room ID is empty or whitespace only
    #[error("room id must not be empty")]
    EmptyRoomId,

    /// Message is empty after trimming
    #[error("message must not be empty")]
    EmptyMessage,
}

/// Errors raised by a [`MessageChannel`](super::MessageChannel)
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Transport could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Connect attempt did not finish in time
    #[error("connection timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Broker answered with an unexpected frame
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Broker sent an ERROR frame
    #[error("broker error: {0}")]
    Broker(String),

    /// Outbound frame could not be written
    #[error("send failed: {0}")]
    Send(String),

    /// Operation requires an open connection
    #[error("channel is not connected")]
    NotConnected,

    /// Transport failed after the connection was established
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection was closed by the peer
    #[error("connection closed")]
    Closed,
}

/// Errors raised by a [`ChatApi`](super::ChatApi)
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the response body could not be read
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Backend answered with a non-success status
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body did not have the expected shape
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}
