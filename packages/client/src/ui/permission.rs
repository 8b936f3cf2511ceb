//! Write-permission toggle control.
//!
//! Purely cosmetic: it mirrors the last state the backend confirmed and has
//! no say over who may actually write.

use crate::domain::RoomPermission;

/// Label shown while only the owner may write
pub const OWNER_ONLY_LABEL: &str = "Owner only";

/// Label shown while everyone may write
pub const EVERYONE_LABEL: &str = "Everyone";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PermissionControl {
    locked: bool,
}

impl PermissionControl {
    pub fn new(initial: RoomPermission) -> Self {
        Self {
            locked: initial.only_owner_can_write,
        }
    }

    /// Reflect a server-confirmed state. Returns whether the control changed.
    pub fn apply(&mut self, permission: RoomPermission) -> bool {
        let changed = self.locked != permission.only_owner_can_write;
        self.locked = permission.only_owner_can_write;
        changed
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn label(&self) -> &'static str {
        if self.locked {
            OWNER_ONLY_LABEL
        } else {
            EVERYONE_LABEL
        }
    }
}
