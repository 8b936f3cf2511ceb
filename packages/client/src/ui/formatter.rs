//! Message formatting utilities for terminal display.

use crate::domain::Identity;

use super::{
    permission::PermissionControl,
    render::{MessageNode, NodeStyle},
};

const RULE: &str = "------------------------------------------------------------";
const BANNER: &str = "============================================================";

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a rendered node
    ///
    /// Chat messages are framed by rules, notices are a single `*` line.
    pub fn format_node(node: &MessageNode) -> String {
        match node.style {
            NodeStyle::System => format!("\n* {}\n", terminal_text(&node.text)),
            NodeStyle::Sent | NodeStyle::Received => {
                let sender = terminal_text(node.sender.as_deref().unwrap_or_default());
                let me_suffix = if node.style == NodeStyle::Sent {
                    " (me)"
                } else {
                    ""
                };
                let sent_at = match &node.time {
                    Some(time) => format!("sent at {}\n", terminal_text(time)),
                    None => String::new(),
                };
                format!(
                    "\n{RULE}\n@{sender}{me_suffix}: {}\n{sent_at}{RULE}\n",
                    terminal_text(&node.text)
                )
            }
        }
    }

    /// Format the banner shown once the session is connected
    ///
    /// # Arguments
    ///
    /// * `identity` - The local identity
    /// * `control` - Current state of the permission control
    pub fn format_connected(identity: &Identity, control: &PermissionControl) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{BANNER}\n"));
        output.push_str(&format!(
            "Room: {}\nYou are '{}'{}\n",
            terminal_text(identity.room_id.as_str()),
            terminal_text(identity.user_name.as_str()),
            if identity.is_owner { " (owner)" } else { "" }
        ));
        output.push_str(&format!("Write permission: {}\n", control.label()));
        output.push_str("Type messages and press Enter to send.");
        if identity.is_owner {
            output.push_str(" '/toggle' switches write permission.");
        }
        output.push_str(" '/quit' or Ctrl+C exits.\n");
        output.push_str(&format!("{BANNER}\n"));
        output
    }

    /// Format a permission control update
    pub fn format_permission(control: &PermissionControl) -> String {
        let icon = if control.is_locked() { "[locked]" } else { "[open]" };
        format!("\n{} Write permission: {}\n", icon, control.label())
    }
}

/// Replace control characters (other than newline and tab) with their
/// escaped form so that message text cannot drive the terminal.
fn terminal_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() && c != '\n' && c != '\t' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}
