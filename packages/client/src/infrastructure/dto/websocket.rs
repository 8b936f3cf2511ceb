//! Payloads exchanged over the room topic and the publish destinations.

use charla_shared::time::parse_timestamp_str;
use serde::{Deserialize, Deserializer, Serialize};

/// Wire tag of a chat event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Chat,
    Join,
    Leave,
    System,
}

/// Chat event as published on `/topic/{roomId}` and returned by the history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub r#type: MessageType,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp: Option<i64>,
}

/// Presence announcement sent to `/app/chat.addUser`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinAnnouncement {
    pub sender_id: String,
    pub room_id: String,
    pub r#type: MessageType,
}

impl JoinAnnouncement {
    pub fn new(sender_id: impl Into<String>, room_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            room_id: room_id.into(),
            r#type: MessageType::Join,
        }
    }
}

/// Chat message sent to `/app/chat.sendMessage`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingChatMessage {
    pub sender_id: String,
    pub room_id: String,
    pub content: String,
    pub r#type: MessageType,
}

impl OutgoingChatMessage {
    pub fn new(
        sender_id: impl Into<String>,
        room_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            room_id: room_id.into(),
            content: content.into(),
            r#type: MessageType::Chat,
        }
    }
}

/// Accepts epoch milliseconds (integer or float) or a date-time string.
///
/// A string that cannot be parsed yields `None` rather than rejecting the frame.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(i64),
        Float(f64),
        Text(String),
    }

    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawTimestamp::Millis(millis)) => Some(millis),
        Some(RawTimestamp::Float(millis)) => Some(millis as i64),
        Some(RawTimestamp::Text(text)) => parse_timestamp_str(&text),
    })
}
