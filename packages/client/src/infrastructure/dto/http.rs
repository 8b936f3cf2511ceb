//! REST API response DTOs.

use serde::Deserialize;

/// Subset of the room resource returned by the toggle endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPermissionDto {
    pub only_owner_can_write: bool,
}

/// Room resource returned by the room creation endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoomDto {
    pub room_id: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub only_owner_can_write: bool,
}
