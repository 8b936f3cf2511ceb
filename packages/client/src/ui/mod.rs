//! Presentation layer: event rendering, message views and the permission control.

pub mod formatter;
pub mod permission;
pub mod render;
pub mod view;

pub use permission::PermissionControl;
pub use render::{MessageNode, NodeStyle, render_event};
pub use view::{MessageArea, MessageLog, TerminalView};
