//! Message area views.
//!
//! [`MessageArea`] is the append-only surface the session renders into.
//! [`MessageLog`] keeps nodes in memory, [`TerminalView`] also prints them.

use std::io::Write;

use super::{formatter::MessageFormatter, permission::PermissionControl, render::MessageNode};

/// Append-only message area
pub trait MessageArea: Send {
    /// Append a node after every node appended so far
    fn append(&mut self, node: MessageNode);

    /// Bring the newest node into view
    fn scroll_to_latest(&mut self);

    /// Reflect a permission control update
    fn show_permission(&mut self, _control: &PermissionControl) {}
}

/// In-memory message area
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    nodes: Vec<MessageNode>,
    /// Index of the node the view was last scrolled to
    scrolled_to: Option<usize>,
    /// Label of the permission control, once it has been shown
    permission_label: Option<&'static str>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[MessageNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn scrolled_to(&self) -> Option<usize> {
        self.scrolled_to
    }

    pub fn permission_label(&self) -> Option<&'static str> {
        self.permission_label
    }

    /// Whole message area as an HTML document fragment
    pub fn to_html(&self) -> String {
        let mut out = String::from("<div id=\"messageArea\">\n");
        for node in &self.nodes {
            out.push_str("  ");
            out.push_str(&node.to_html());
            out.push('\n');
        }
        out.push_str("</div>\n");
        out
    }
}

impl MessageArea for MessageLog {
    fn append(&mut self, node: MessageNode) {
        self.nodes.push(node);
    }

    fn scroll_to_latest(&mut self) {
        self.scrolled_to = self.nodes.len().checked_sub(1);
    }

    fn show_permission(&mut self, control: &PermissionControl) {
        self.permission_label = Some(control.label());
    }
}

/// Terminal message area: prints every node and keeps a [`MessageLog`]
#[derive(Debug, Clone)]
pub struct TerminalView {
    user_name: String,
    log: MessageLog,
}

impl TerminalView {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            log: MessageLog::new(),
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// `text` followed by a fresh input prompt
    fn with_prompt(&self, text: &str) -> String {
        format!("{}{}> ", text, self.user_name)
    }

    fn print_with_prompt(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(self.with_prompt(text).as_bytes());
        let _ = stdout.flush();
    }
}

impl MessageArea for TerminalView {
    fn append(&mut self, node: MessageNode) {
        self.print_with_prompt(&MessageFormatter::format_node(&node));
        self.log.append(node);
    }

    fn scroll_to_latest(&mut self) {
        // The prompt printed after each node already sits below the newest one.
        self.log.scroll_to_latest();
    }

    fn show_permission(&mut self, control: &PermissionControl) {
        self.print_with_prompt(&MessageFormatter::format_permission(control));
        self.log.show_permission(control);
    }
}
