//! STOMP 1.2 frame codec.
//!
//! One frame per WebSocket text message. Header values are escaped
//! (`\\`, `\n`, `\r`, `\c`) on every command except `CONNECT` and
//! `CONNECTED`. A body is terminated by NUL, or sized by `content-length`
//! when that header is present.

use std::fmt;

use thiserror::Error;

/// STOMP codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Input ended before the header block was terminated
    #[error("incomplete frame")]
    Incomplete,

    /// Command line is not a STOMP command
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Header line without a `:` separator
    #[error("malformed header line '{0}'")]
    MalformedHeader(String),

    /// Undefined escape sequence in a header
    #[error("invalid escape sequence in '{0}'")]
    InvalidEscape(String),

    /// `content-length` is not a byte count that fits the body
    #[error("invalid content-length '{0}'")]
    InvalidContentLength(String),

    /// Body is not terminated by NUL
    #[error("frame body is not NUL-terminated")]
    MissingNul,
}

/// STOMP commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Connect,
    Stomp,
    Connected,
    Send,
    Subscribe,
    Unsubscribe,
    Message,
    Receipt,
    Error,
    Disconnect,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Stomp => "STOMP",
            Self::Connected => "CONNECTED",
            Self::Send => "SEND",
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Message => "MESSAGE",
            Self::Receipt => "RECEIPT",
            Self::Error => "ERROR",
            Self::Disconnect => "DISCONNECT",
        }
    }

    fn parse(line: &str) -> Result<Self, FrameError> {
        let command = match line {
            "CONNECT" => Self::Connect,
            "STOMP" => Self::Stomp,
            "CONNECTED" => Self::Connected,
            "SEND" => Self::Send,
            "SUBSCRIBE" => Self::Subscribe,
            "UNSUBSCRIBE" => Self::Unsubscribe,
            "MESSAGE" => Self::Message,
            "RECEIPT" => Self::Receipt,
            "ERROR" => Self::Error,
            "DISCONNECT" => Self::Disconnect,
            other => return Err(FrameError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }

    /// CONNECT and CONNECTED headers are never escaped
    fn escapes_headers(self) -> bool {
        !matches!(self, Self::Connect | Self::Stomp | Self::Connected)
    }

    fn carries_body(self) -> bool {
        matches!(self, Self::Send | Self::Message | Self::Error)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single STOMP frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Value of the first header named `name` (repeated headers: first wins)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Serialize to wire text, including the trailing NUL
    pub fn encode(&self) -> String {
        let escape = self.command.escapes_headers();
        let mut out = String::with_capacity(64 + self.body.len());
        out.push_str(self.command.as_str());
        out.push('\n');

        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }

        if self.command.carries_body()
            && !self.body.is_empty()
            && self.get_header("content-length").is_none()
        {
            out.push_str(&format!("content-length:{}\n", self.body.len()));
        }

        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parse one frame from wire text.
    ///
    /// Returns `Ok(None)` for a heart-beat (input made only of EOLs).
    pub fn decode(text: &str) -> Result<Option<Self>, FrameError> {
        let text = text.trim_start_matches(['\r', '\n']);
        if text.is_empty() {
            return Ok(None);
        }

        let (command_line, mut rest) = text.split_once('\n').ok_or(FrameError::Incomplete)?;
        let command = Command::parse(command_line.trim_end_matches('\r'))?;
        let escaped = command.escapes_headers();

        let mut headers = Vec::new();
        loop {
            let (line, remaining) = rest.split_once('\n').ok_or(FrameError::Incomplete)?;
            rest = remaining;
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                break;
            }

            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| FrameError::MalformedHeader(line.to_string()))?;
            if escaped {
                headers.push((unescape_header(name)?, unescape_header(value)?));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        let mut frame = Self {
            command,
            headers,
            body: String::new(),
        };

        frame.body = match frame.get_header("content-length") {
            Some(raw_len) => {
                let len: usize = raw_len
                    .trim()
                    .parse()
                    .map_err(|_| FrameError::InvalidContentLength(raw_len.to_string()))?;
                let body = rest
                    .get(..len)
                    .ok_or_else(|| FrameError::InvalidContentLength(raw_len.to_string()))?;
                if rest.as_bytes().get(len) != Some(&0) {
                    return Err(FrameError::MissingNul);
                }
                body.to_string()
            }
            None => {
                let end = rest.find('\0').ok_or(FrameError::MissingNul)?;
                rest[..end].to_string()
            }
        };

        Ok(Some(frame))
    }
}

fn escape_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_header(value: &str) -> Result<String, FrameError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            _ => return Err(FrameError::InvalidEscape(value.to_string())),
        }
    }
    Ok(out)
}
