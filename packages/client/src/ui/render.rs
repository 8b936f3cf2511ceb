//! Mapping from chat events to view nodes.

use charla_shared::time::timestamp_to_local_time;

use crate::domain::{ChatEvent, EventKind, UserName};

/// Visual style of a rendered node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStyle {
    /// Chat message written by the local user
    Sent,
    /// Chat message written by someone else
    Received,
    /// JOIN / LEAVE / SYSTEM notice
    System,
}

impl NodeStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
            Self::System => "system",
        }
    }
}

/// One entry of the message area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNode {
    pub style: NodeStyle,
    /// Sender shown above chat bubbles; notices have none
    pub sender: Option<String>,
    /// Chat content or notice text, always plain text
    pub text: String,
    /// Clock time of the event, when the event carried a timestamp
    pub time: Option<String>,
}

/// Render an event for the local user `me`.
pub fn render_event(event: &ChatEvent, me: &UserName) -> MessageNode {
    match event.kind {
        EventKind::Chat => {
            let style = if event.sender_id == me.as_str() {
                NodeStyle::Sent
            } else {
                NodeStyle::Received
            };
            MessageNode {
                style,
                sender: Some(event.sender_id.clone()),
                text: event.content.clone(),
                time: event
                    .timestamp
                    .and_then(|t| timestamp_to_local_time(t.value())),
            }
        }
        EventKind::Join | EventKind::Leave | EventKind::System => MessageNode {
            style: NodeStyle::System,
            sender: None,
            text: event.content.clone(),
            time: None,
        },
    }
}

impl MessageNode {
    /// HTML fragment for this node. Every text field is escaped.
    pub fn to_html(&self) -> String {
        let class = self.style.css_class();
        match self.style {
            NodeStyle::System => {
                format!(
                    r#"<div class="message {class}">{}</div>"#,
                    escape_html(&self.text)
                )
            }
            NodeStyle::Sent | NodeStyle::Received => {
                let sender = self.sender.as_deref().unwrap_or_default();
                let time = self.time.as_deref().unwrap_or_default();
                format!(
                    r#"<div class="message {class}"><strong>{}</strong><p class="mb-0">{}</p><small class="text-muted">{}</small></div>"#,
                    escape_html(sender),
                    escape_html(&self.text),
                    escape_html(time)
                )
            }
        }
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
