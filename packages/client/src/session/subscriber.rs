//! Channel subscriber: room topic subscription, outgoing payloads and frame decoding.

use crate::{
    domain::{
        ChannelError, ChatEvent, Identity, MessageChannel, MessageContent, RoomId, Subscription,
        channel::{ADD_USER_DESTINATION, SEND_MESSAGE_DESTINATION},
    },
    error::ClientError,
    infrastructure::dto::websocket::{ChatMessageDto, JoinAnnouncement, OutgoingChatMessage},
};

/// Subscribe to the topic of `room`
pub async fn subscribe_room(
    channel: &mut dyn MessageChannel,
    room: &RoomId,
) -> Result<Subscription, ChannelError> {
    channel.subscribe(&room.topic()).await
}

/// Publish the JOIN announcement for `identity`
pub async fn announce_join(
    channel: &mut dyn MessageChannel,
    identity: &Identity,
) -> Result<(), ClientError> {
    let payload = JoinAnnouncement::new(identity.user_name.as_str(), identity.room_id.as_str());
    let body = serde_json::to_string(&payload)?;
    channel.publish(ADD_USER_DESTINATION, body).await?;
    Ok(())
}

/// Publish a chat message written by `identity`
pub async fn publish_chat(
    channel: &mut dyn MessageChannel,
    identity: &Identity,
    content: MessageContent,
) -> Result<(), ClientError> {
    let payload = OutgoingChatMessage::new(
        identity.user_name.as_str(),
        identity.room_id.as_str(),
        content.into_string(),
    );
    let body = serde_json::to_string(&payload)?;
    channel.publish(SEND_MESSAGE_DESTINATION, body).await?;
    Ok(())
}

/// Decode a frame body into a chat event
pub fn decode_event(body: &str) -> Result<ChatEvent, serde_json::Error> {
    serde_json::from_str::<ChatMessageDto>(body).map(ChatEvent::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{EventKind, Timestamp, UserName},
        session::testing::{ChannelCall, FakeChannel},
    };

    fn identity() -> Identity {
        Identity::new(
            UserName::new("alice").unwrap(),
            RoomId::new("room1").unwrap(),
            false,
        )
    }

    #[tokio::test]
    async fn test_subscribe_room_uses_topic() {
        // テスト項目: ルームのトピック /topic/{roomId} を購読する
        // given (前提条件):
        let (mut channel, calls) = FakeChannel::new();
        let room = RoomId::new("room1").unwrap();

        // when (操作):
        let subscription = subscribe_room(&mut channel, &room).await.unwrap();

        // then (期待する結果):
        assert_eq!(subscription.destination(), "/topic/room1");
        assert_eq!(
            calls.snapshot(),
            vec![ChannelCall::Subscribe("/topic/room1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_announce_join_payload() {
        // テスト項目: JOIN 通知が /app/chat.addUser に送られる
        // given (前提条件):
        let (mut channel, calls) = FakeChannel::new();

        // when (操作):
        announce_join(&mut channel, &identity()).await.unwrap();

        // then (期待する結果):
        let published = calls.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "/app/chat.addUser");
        assert_eq!(
            published[0].1,
            serde_json::json!({"senderId": "alice", "roomId": "room1", "type": "JOIN"})
        );
    }

    #[tokio::test]
    async fn test_publish_chat_payload() {
        // テスト項目: チャットが /app/chat.sendMessage に送られる
        // given (前提条件):
        let (mut channel, calls) = FakeChannel::new();
        let content = MessageContent::new(" hello ").unwrap();

        // when (操作):
        publish_chat(&mut channel, &identity(), content).await.unwrap();

        // then (期待する結果):
        let published = calls.published();
        assert_eq!(published[0].0, "/app/chat.sendMessage");
        assert_eq!(
            published[0].1,
            serde_json::json!({"senderId": "alice", "roomId": "room1", "content": "hello", "type": "CHAT"})
        );
    }

    #[tokio::test]
    async fn test_publish_failure_is_reported() {
        // テスト項目: 送信に失敗した場合は Connection エラーになる
        // given (前提条件):
        let (mut channel, _calls) = FakeChannel::new();
        channel.fail_publish = true;

        // when (操作):
        let result = announce_join(&mut channel, &identity()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::Connection(_))));
    }

    #[test]
    fn test_decode_event() {
        // テスト項目: フレーム本文が ChatEvent にデコードされる
        // given (前提条件):
        let body = r#"{"senderId":"bob","roomId":"room1","content":"hi","type":"CHAT","timestamp":5}"#;

        // when (操作):
        let event = decode_event(body).unwrap();

        // then (期待する結果):
        assert_eq!(event.sender_id, "bob");
        assert_eq!(event.kind, EventKind::Chat);
        assert_eq!(event.timestamp, Some(Timestamp::new(5)));
    }

    #[test]
    fn test_decode_event_rejects_non_json() {
        // テスト項目: JSON でない本文はデコードエラーになる
        // given (前提条件):
        let body = "hello";

        // when (操作):
        let result = decode_event(body);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
