//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatEvent, ChatRoom, EventKind, RoomPermission, Timestamp};
use crate::infrastructure::dto::{http as http_dto, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::MessageType> for EventKind {
    fn from(value: dto::MessageType) -> Self {
        match value {
            dto::MessageType::Chat => Self::Chat,
            dto::MessageType::Join => Self::Join,
            dto::MessageType::Leave => Self::Leave,
            dto::MessageType::System => Self::System,
        }
    }
}

impl From<dto::ChatMessageDto> for ChatEvent {
    fn from(dto: dto::ChatMessageDto) -> Self {
        Self {
            sender_id: dto.sender_id.unwrap_or_default(),
            room_id: dto.room_id,
            content: dto.content.unwrap_or_default(),
            kind: dto.r#type.into(),
            timestamp: dto.timestamp.map(Timestamp::new),
        }
    }
}

impl From<http_dto::RoomPermissionDto> for RoomPermission {
    fn from(dto: http_dto::RoomPermissionDto) -> Self {
        Self {
            only_owner_can_write: dto.only_owner_can_write,
        }
    }
}

impl From<http_dto::ChatRoomDto> for ChatRoom {
    fn from(dto: http_dto::ChatRoomDto) -> Self {
        Self {
            room_id: dto.room_id,
            owner_id: dto.owner_id.unwrap_or_default(),
            active: dto.active,
            only_owner_can_write: dto.only_owner_can_write,
        }
    }
}
