//! History loader.

use crate::domain::{ApiError, ChatApi, ChatEvent, Identity};

/// Fetch the backlog of the identity's room, oldest first
pub async fn fetch_history(
    api: &dyn ChatApi,
    identity: &Identity,
) -> Result<Vec<ChatEvent>, ApiError> {
    let events = api
        .fetch_history(&identity.room_id, &identity.user_name)
        .await?;
    tracing::debug!(
        "Fetched {} history entries for room '{}'",
        events.len(),
        identity.room_id
    );
    Ok(events)
}
