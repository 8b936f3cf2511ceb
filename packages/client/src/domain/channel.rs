//! Publish/subscribe channel abstraction.
//!
//! The session only depends on this trait. The STOMP-over-WebSocket
//! implementation lives in `infrastructure::stomp`.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ChannelError;

/// Destination the JOIN announcement is published to
pub const ADD_USER_DESTINATION: &str = "/app/chat.addUser";

/// Destination chat messages are published to
pub const SEND_MESSAGE_DESTINATION: &str = "/app/chat.sendMessage";

/// Sending half used by a transport to deliver frame bodies to a subscription
pub type SubscriptionSender = mpsc::UnboundedSender<Result<String, ChannelError>>;

/// Messaging channel trait
///
/// Publishing is fire-and-forget: `publish` returns once the frame has been
/// handed to the transport, no delivery acknowledgment is awaited.
#[async_trait]
pub trait MessageChannel: Send {
    /// Establish the transport connection
    async fn connect(&mut self) -> Result<(), ChannelError>;

    /// Register a listener for `destination`
    async fn subscribe(&mut self, destination: &str) -> Result<Subscription, ChannelError>;

    /// Send a serialized payload to `destination`
    async fn publish(&mut self, destination: &str, body: String) -> Result<(), ChannelError>;

    /// Tear down the connection
    async fn disconnect(&mut self) -> Result<(), ChannelError>;
}

/// Handle to an active subscription.
///
/// Frame bodies arrive in the order the transport delivered them. An `Err`
/// item reports a transport failure; `None` means the transport has gone away.
#[derive(Debug)]
pub struct Subscription {
    id: String,
    destination: String,
    frames: mpsc::UnboundedReceiver<Result<String, ChannelError>>,
}

impl Subscription {
    /// Create a subscription together with the sender the transport feeds
    pub fn channel(
        id: impl Into<String>,
        destination: impl Into<String>,
    ) -> (Self, SubscriptionSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = Self {
            id: id.into(),
            destination: destination.into(),
            frames: rx,
        };
        (subscription, tx)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Wait for the next inbound frame body
    pub async fn next_frame(&mut self) -> Option<Result<String, ChannelError>> {
        self.frames.recv().await
    }
}
