//! Client configuration.

use std::{path::PathBuf, time::Duration};

use reqwest::Url;

use crate::error::ClientError;

/// Default backend base URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Default WebSocket path, relative to the server URL (raw WebSocket endpoint of `/ws`)
pub const DEFAULT_WS_PATH: &str = "/ws/websocket";

/// Endpoints and tuning for a client run
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL, always ending with `/`
    pub http_base: Url,
    /// STOMP WebSocket URL
    pub ws_url: Url,
    /// Upper bound for the connect handshake; `None` waits indefinitely
    pub connect_timeout: Option<Duration>,
    /// Where to write an HTML transcript on exit
    pub transcript: Option<PathBuf>,
}

impl ClientConfig {
    /// Derive the configuration from the server URL.
    ///
    /// The WebSocket URL uses `ws` for `http` and `wss` for `https`, with
    /// `ws_path` resolved below the server URL.
    pub fn new(server_url: &str, ws_path: &str) -> Result<Self, ClientError> {
        let mut http_base = Url::parse(server_url)
            .map_err(|e| ClientError::Config(format!("invalid server URL '{server_url}': {e}")))?;

        let ws_scheme = match http_base.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(ClientError::Config(format!(
                    "unsupported scheme '{other}', expected http or https"
                )));
            }
        };

        if !http_base.path().ends_with('/') {
            let path = format!("{}/", http_base.path());
            http_base.set_path(&path);
        }
        http_base.set_query(None);
        http_base.set_fragment(None);

        let mut ws_url = http_base
            .join(ws_path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("invalid WebSocket path '{ws_path}': {e}")))?;
        ws_url
            .set_scheme(ws_scheme)
            .map_err(|()| ClientError::Config(format!("cannot use scheme '{ws_scheme}'")))?;

        Ok(Self {
            http_base,
            ws_url,
            connect_timeout: None,
            transcript: None,
        })
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_transcript(mut self, path: Option<PathBuf>) -> Self {
        self.transcript = path;
        self
    }
}
