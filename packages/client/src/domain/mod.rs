//! Domain layer of the chat client.
//!
//! Value objects, the chat event model, and the traits that the session
//! depends on. Concrete transports live in the infrastructure layer.

pub mod api;
pub mod channel;
pub mod connection;
pub mod error;
pub mod event;
pub mod identity;
pub mod permission;

pub use api::ChatApi;
pub use channel::{MessageChannel, Subscription, SubscriptionSender};
pub use connection::ConnectionState;
pub use error::{ApiError, ChannelError, DomainError};
pub use event::{ChatEvent, EventKind, Timestamp};
pub use identity::{Identity, MessageContent, RoomId, UserName};
pub use permission::{ChatRoom, RoomPermission};
