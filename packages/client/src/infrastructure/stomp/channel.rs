//! STOMP implementation of [`MessageChannel`].
//!
//! ## Responsibilities
//!
//! - WebSocket connection and STOMP `CONNECT` handshake
//! - `SUBSCRIBE` / `SEND` / `DISCONNECT` frames on the write half
//! - A reader task that routes `MESSAGE` frames to subscriptions by their
//!   `subscription` header

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use reqwest::Url;
use tokio::{net::TcpStream, sync::Mutex, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use uuid::Uuid;

use crate::{
    domain::{ChannelError, MessageChannel, Subscription, SubscriptionSender},
    infrastructure::USER_HEADER,
};

use super::frame::{Command, Frame};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type Routes = Arc<Mutex<HashMap<String, SubscriptionSender>>>;

/// STOMP 1.2 client over a WebSocket connection
pub struct StompChannel {
    url: Url,
    user_id: String,
    writer: Option<WsSink>,
    /// Active subscriptions.
    ///
    /// Key: subscription id
    /// Value: sender feeding the matching [`Subscription`]
    routes: Routes,
    reader: Option<JoinHandle<()>>,
}

impl StompChannel {
    /// Create a channel for `url` acting as `user_id`. Nothing is connected yet.
    pub fn new(url: Url, user_id: impl Into<String>) -> Self {
        Self {
            url,
            user_id: user_id.into(),
            writer: None,
            routes: Arc::new(Mutex::new(HashMap::new())),
            reader: None,
        }
    }

    async fn send_frame(&mut self, frame: Frame) -> Result<(), ChannelError> {
        let writer = self.writer.as_mut().ok_or(ChannelError::NotConnected)?;
        tracing::trace!("-> {}", frame.command);
        writer
            .send(Message::Text(frame.encode().into()))
            .await
            .map_err(|e| ChannelError::Send(e.to_string()))
    }
}

#[async_trait]
impl MessageChannel for StompChannel {
    async fn connect(&mut self) -> Result<(), ChannelError> {
        if self.writer.is_some() {
            return Ok(());
        }

        if self.url.scheme() == "wss" {
            install_crypto_provider();
        }

        let (ws_stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;
        let (mut write, mut read) = ws_stream.split();

        let host = self.url.host_str().unwrap_or("localhost").to_string();
        let connect = Frame::new(Command::Connect)
            .header("accept-version", "1.2,1.1")
            .header("host", host)
            .header("heart-beat", "0,0")
            .header(USER_HEADER, self.user_id.clone());
        write
            .send(Message::Text(connect.encode().into()))
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;

        await_connected(&mut read).await?;
        tracing::info!("STOMP session established with {}", self.url);

        self.writer = Some(write);
        self.reader = Some(tokio::spawn(read_loop(read, self.routes.clone())));
        Ok(())
    }

    async fn subscribe(&mut self, destination: &str) -> Result<Subscription, ChannelError> {
        if self.writer.is_none() {
            return Err(ChannelError::NotConnected);
        }

        let id = format!("sub-{}", Uuid::new_v4().simple());
        let (subscription, sender) = Subscription::channel(id.clone(), destination);
        self.routes.lock().await.insert(id.clone(), sender);

        let frame = Frame::new(Command::Subscribe)
            .header("id", id.clone())
            .header("destination", destination)
            .header("ack", "auto");
        if let Err(e) = self.send_frame(frame).await {
            self.routes.lock().await.remove(&id);
            return Err(e);
        }

        tracing::debug!("Subscribed to '{}' as '{}'", destination, id);
        Ok(subscription)
    }

    async fn publish(&mut self, destination: &str, body: String) -> Result<(), ChannelError> {
        let frame = Frame::new(Command::Send)
            .header("destination", destination)
            .header("content-type", "application/json")
            .header(USER_HEADER, self.user_id.clone())
            .with_body(body);
        self.send_frame(frame).await?;
        tracing::debug!("Published to '{}'", destination);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), ChannelError> {
        if self.writer.is_none() {
            return Ok(());
        }

        let receipt = format!("disconnect-{}", Uuid::new_v4().simple());
        let frame = Frame::new(Command::Disconnect).header("receipt", receipt);
        if let Err(e) = self.send_frame(frame).await {
            tracing::warn!("Failed to send DISCONNECT: {}", e);
        }

        if let Some(mut writer) = self.writer.take()
            && let Err(e) = writer.close().await
        {
            tracing::debug!("WebSocket close error: {}", e);
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.routes.lock().await.clear();

        tracing::info!("Disconnected from {}", self.url);
        Ok(())
    }
}

impl Drop for StompChannel {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Make ring the process-wide rustls provider for `wss` connections.
/// A provider installed earlier wins.
fn install_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::trace!("rustls crypto provider already installed");
    }
}

/// Wait for the broker's answer to CONNECT
async fn await_connected(read: &mut SplitStream<WsStream>) -> Result<(), ChannelError> {
    while let Some(message) = read.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => return Err(ChannelError::Connect(e.to_string())),
        };

        let frame = match Frame::decode(text.as_str()) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => return Err(ChannelError::Protocol(e.to_string())),
        };

        return match frame.command {
            Command::Connected => Ok(()),
            Command::Error => Err(ChannelError::Broker(error_message(&frame))),
            other => Err(ChannelError::Protocol(format!(
                "expected CONNECTED, got {other}"
            ))),
        };
    }

    Err(ChannelError::Connect(
        "connection closed during handshake".to_string(),
    ))
}

/// Route inbound frames until the connection ends
async fn read_loop(mut read: SplitStream<WsStream>, routes: Routes) {
    while let Some(message) = read.next().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                tracing::info!("Broker closed the connection");
                break;
            }
            Ok(Message::Binary(data)) => {
                tracing::warn!("Ignoring {} bytes of binary data", data.len());
                continue;
            }
            Ok(_) => continue,
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!("WebSocket read error: {}", reason);
                fail_all(&routes, || ChannelError::Transport(reason.clone())).await;
                break;
            }
        };

        let frame = match Frame::decode(text.as_str()) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Dropping malformed STOMP frame: {}", e);
                continue;
            }
        };

        match frame.command {
            Command::Message => route_message(&routes, frame).await,
            Command::Error => {
                let message = error_message(&frame);
                tracing::error!("Broker error: {}", message);
                fail_all(&routes, || ChannelError::Broker(message.clone())).await;
                break;
            }
            Command::Receipt => {
                tracing::debug!("Receipt {:?}", frame.get_header("receipt-id"));
            }
            other => tracing::debug!("Ignoring {} frame", other),
        }
    }

    // Dropping the senders ends every subscription stream.
    routes.lock().await.clear();
}

async fn route_message(routes: &Routes, frame: Frame) {
    let Some(subscription) = frame.get_header("subscription").map(str::to_string) else {
        tracing::warn!("MESSAGE frame without subscription header");
        return;
    };

    let routes = routes.lock().await;
    match routes.get(&subscription) {
        Some(sender) => {
            if sender.send(Ok(frame.body)).is_err() {
                tracing::debug!("Subscription '{}' is no longer read", subscription);
            }
        }
        None => tracing::warn!("MESSAGE for unknown subscription '{}'", subscription),
    }
}

async fn fail_all(routes: &Routes, make_error: impl Fn() -> ChannelError) {
    let routes = routes.lock().await;
    for sender in routes.values() {
        let _ = sender.send(Err(make_error()));
    }
}

fn error_message(frame: &Frame) -> String {
    match frame.get_header("message") {
        Some(message) => message.to_string(),
        None if !frame.body.is_empty() => frame.body.clone(),
        None => "unspecified broker error".to_string(),
    }
}
