//! REST backend abstraction.

use async_trait::async_trait;

use super::{ApiError, ChatEvent, ChatRoom, RoomId, RoomPermission, UserName};

/// Chat REST API trait
///
/// Every call carries the acting user, which backends read from the
/// `X-User-Id` header.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Fetch the room backlog, oldest first
    async fn fetch_history(
        &self,
        room_id: &RoomId,
        user: &UserName,
    ) -> Result<Vec<ChatEvent>, ApiError>;

    /// Flip the room's write restriction and return the new state
    async fn toggle_write(
        &self,
        room_id: &RoomId,
        owner: &UserName,
    ) -> Result<RoomPermission, ApiError>;

    /// Create a new room owned by `owner`
    async fn create_room(&self, owner: &UserName) -> Result<ChatRoom, ApiError>;
}
