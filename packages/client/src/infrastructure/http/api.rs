//! `reqwest` implementation of [`ChatApi`].

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::{
    domain::{ApiError, ChatApi, ChatEvent, ChatRoom, RoomId, RoomPermission, UserName},
    infrastructure::{
        USER_HEADER,
        dto::{
            http::{ChatRoomDto, RoomPermissionDto},
            websocket::ChatMessageDto,
        },
    },
};

/// Chat REST API over HTTP
#[derive(Debug, Clone)]
pub struct HttpChatApi {
    client: Client,
    base: Url,
}

impl HttpChatApi {
    /// Create a client for the backend rooted at `base` (e.g. `http://127.0.0.1:8080/`)
    pub fn new(base: Url) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    /// `{base}/api/chat/room[/{segments}...]`
    fn room_url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| ApiError::Request {
                url: self.base.to_string(),
                message: "base URL cannot carry a path".to_string(),
            })?;
            path.pop_if_empty().extend(["api", "chat", "room"]);
            path.extend(segments);
        }
        Ok(url)
    }

    pub fn history_url(&self, room_id: &RoomId) -> Result<Url, ApiError> {
        self.room_url(&[room_id.as_str(), "messages"])
    }

    pub fn toggle_write_url(&self, room_id: &RoomId, owner: &UserName) -> Result<Url, ApiError> {
        let mut url = self.room_url(&[room_id.as_str(), "toggleWrite"])?;
        url.query_pairs_mut().append_pair("ownerId", owner.as_str());
        Ok(url)
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn fetch_history(
        &self,
        room_id: &RoomId,
        user: &UserName,
    ) -> Result<Vec<ChatEvent>, ApiError> {
        let url = self.history_url(room_id)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(USER_HEADER, user.as_str())
            .send()
            .await
            .map_err(|e| request_error(&url, &e))?;
        let entries: Vec<serde_json::Value> = read_json(&url, response).await?;

        Ok(decode_history(entries))
    }

    async fn toggle_write(
        &self,
        room_id: &RoomId,
        owner: &UserName,
    ) -> Result<RoomPermission, ApiError> {
        let url = self.toggle_write_url(room_id, owner)?;
        tracing::debug!("PUT {}", url);

        let response = self
            .client
            .put(url.clone())
            .header(USER_HEADER, owner.as_str())
            .send()
            .await
            .map_err(|e| request_error(&url, &e))?;
        let permission: RoomPermissionDto = read_json(&url, response).await?;

        Ok(permission.into())
    }

    async fn create_room(&self, owner: &UserName) -> Result<ChatRoom, ApiError> {
        let url = self.room_url(&[])?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url.clone())
            .header(USER_HEADER, owner.as_str())
            .send()
            .await
            .map_err(|e| request_error(&url, &e))?;
        let room: ChatRoomDto = read_json(&url, response).await?;

        Ok(room.into())
    }
}

fn request_error(url: &Url, error: &reqwest::Error) -> ApiError {
    ApiError::Request {
        url: url.to_string(),
        message: error.to_string(),
    }
}

async fn read_json<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(|e| request_error(url, &e))?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Decode history entries one by one, skipping the ones that do not parse
fn decode_history(entries: Vec<serde_json::Value>) -> Vec<ChatEvent> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, entry)| match serde_json::from_value::<ChatMessageDto>(entry) {
                Ok(dto) => Some(dto.into()),
                Err(e) => {
                    tracing::warn!("Skipping history entry #{}: {}", index, e);
                    None
                }
            },
        )
        .collect()
}
