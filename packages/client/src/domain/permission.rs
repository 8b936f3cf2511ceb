//! Room permission state as reported by the backend.

/// Server-owned write restriction of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoomPermission {
    pub only_owner_can_write: bool,
}

/// A room as returned by the room creation endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoom {
    pub room_id: String,
    pub owner_id: String,
    pub active: bool,
    pub only_owner_can_write: bool,
}

impl ChatRoom {
    pub fn permission(&self) -> RoomPermission {
        RoomPermission {
            only_owner_can_write: self.only_owner_can_write,
        }
    }
}
