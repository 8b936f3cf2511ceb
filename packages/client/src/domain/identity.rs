//! Identity value objects.
//!
//! `UserName` and `RoomId` play the role of the login form: both reject
//! empty input, so a session can never be created from a blank submission.

use std::fmt;

use super::DomainError;

/// Free-text user name (trimmed, non-empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserName(String);

impl UserName {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(DomainError::EmptyUserName);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Room identifier (trimmed, non-empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(DomainError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Topic every participant of this room subscribes to
    pub fn topic(&self) -> String {
        format!("/topic/{}", self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outgoing chat text from the compose form (trimmed, non-empty)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DomainError::EmptyMessage);
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Who the local user is, fixed for the lifetime of a session.
///
/// Ownership is asserted client-side only; the backend decides whether a
/// toggle request is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_name: UserName,
    pub room_id: RoomId,
    pub is_owner: bool,
}

impl Identity {
    pub fn new(user_name: UserName, room_id: RoomId, is_owner: bool) -> Self {
        Self {
            user_name,
            room_id,
            is_owner,
        }
    }
}
