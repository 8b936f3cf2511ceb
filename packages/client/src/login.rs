//! Login form.
//!
//! Validates what the user typed before any session exists, so the session
//! never sees an empty user name or room id.

use crate::domain::{DomainError, RoomId, UserName};

/// Raw login input
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub user_name: String,
    /// Room to join; ignored when `create_room` is set
    pub room_id: Option<String>,
    /// Assert room ownership (client-side only)
    pub owner: bool,
    /// Create a new room owned by the user instead of joining one
    pub create_room: bool,
}

/// Which room the session goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomChoice {
    Join(RoomId),
    Create,
}

/// Validated login input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub user_name: UserName,
    pub room: RoomChoice,
    pub is_owner: bool,
}

impl LoginForm {
    /// Validate the form. Both fields are required unless a room is created.
    pub fn submit(self) -> Result<LoginRequest, DomainError> {
        let user_name = UserName::new(self.user_name)?;

        if self.create_room {
            return Ok(LoginRequest {
                user_name,
                room: RoomChoice::Create,
                is_owner: true,
            });
        }

        let room_id = RoomId::new(self.room_id.unwrap_or_default())?;
        Ok(LoginRequest {
            user_name,
            room: RoomChoice::Join(room_id),
            is_owner: self.owner,
        })
    }
}
