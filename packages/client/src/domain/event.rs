//! Chat event model.

/// Kind of a chat event.
///
/// Closed set: a frame carrying any other tag is rejected while decoding and
/// never reaches rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Chat,
    Join,
    Leave,
    System,
}

/// Server-assigned time of an event (Unix epoch milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// A chat event received from the room topic or replayed from history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    pub sender_id: String,
    /// Room the event was published to, when the backend included it
    pub room_id: Option<String>,
    pub content: String,
    pub kind: EventKind,
    pub timestamp: Option<Timestamp>,
}

impl ChatEvent {
    /// Whether this event may be shown in `room`.
    ///
    /// Events without a room id are trusted to come from the subscribed topic.
    pub fn belongs_to(&self, room: &str) -> bool {
        self.room_id.as_deref().is_none_or(|id| id == room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(room_id: Option<&str>) -> ChatEvent {
        ChatEvent {
            sender_id: "alice".to_string(),
            room_id: room_id.map(str::to_string),
            content: "hi".to_string(),
            kind: EventKind::Chat,
            timestamp: None,
        }
    }

    #[test]
    fn test_belongs_to_matching_room() {
        // テスト項目: 同じルームのイベントは所属していると判定される
        // given (前提条件):
        let event = event(Some("room1"));

        // when (操作):
        let result = event.belongs_to("room1");

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_belongs_to_other_room() {
        // テスト項目: 別ルームのイベントは所属していないと判定される
        // given (前提条件):
        let event = event(Some("room2"));

        // when (操作):
        let result = event.belongs_to("room1");

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_belongs_to_without_room_id() {
        // テスト項目: ルーム ID を持たないイベントは購読中のルームに属するとみなす
        // given (前提条件):
        let event = event(None);

        // when (操作):
        let result = event.belongs_to("room1");

        // then (期待する結果):
        assert!(result);
    }
}
