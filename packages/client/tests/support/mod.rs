//! In-process fake of the chat backend: a STOMP broker over WebSocket plus
//! the REST endpoints the client calls. Binds an ephemeral port.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post, put},
};
use charla_client::{
    ClientError,
    domain::{ChannelError, ConnectionState},
    infrastructure::stomp::{Command, Frame},
    session::Session,
    ui::MessageLog,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::mpsc};

/// Something the backend saw, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    /// STOMP `SEND`: destination, `X-User-Id` header, JSON body
    Send {
        destination: String,
        user: Option<String>,
        body: Value,
    },
    /// REST call: method, path with query, `X-User-Id` header
    Rest {
        method: &'static str,
        path: String,
        user: Option<String>,
    },
}

type Outbox = mpsc::UnboundedSender<String>;

#[derive(Default)]
struct BrokerState {
    recorded: Mutex<Vec<Recorded>>,
    /// topic -> (subscription id, connection outbox)
    subscribers: Mutex<HashMap<String, Vec<(String, Outbox)>>>,
    history: Mutex<HashMap<String, Vec<Value>>>,
    write_locked: Mutex<HashMap<String, bool>>,
    created_rooms: Mutex<u32>,
}

impl BrokerState {
    fn record(&self, entry: Recorded) {
        self.recorded.lock().unwrap().push(entry);
    }

    fn broadcast(&self, topic: &str, body: &str) {
        let subscribers = self.subscribers.lock().unwrap();
        let Some(targets) = subscribers.get(topic) else {
            return;
        };
        for (index, (subscription, outbox)) in targets.iter().enumerate() {
            let frame = Frame::new(Command::Message)
                .header("destination", topic)
                .header("subscription", subscription.as_str())
                .header("message-id", format!("msg-{index}"))
                .header("content-type", "application/json")
                .with_body(body);
            outbox.send(frame.encode()).ok();
        }
    }
}

/// Running fake backend
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<BrokerState>,
    server: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BrokerState::default());
        let app = Router::new()
            .route("/ws/websocket", get(websocket_handler))
            .route("/api/chat/room", post(create_room_handler))
            .route("/api/chat/room/{room}/messages", get(history_handler))
            .route("/api/chat/room/{room}/toggleWrite", put(toggle_write_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            server,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn seed_history(&self, room: &str, entries: Vec<Value>) {
        self.state
            .history
            .lock()
            .unwrap()
            .insert(room.to_string(), entries);
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }

    /// Bodies of the `SEND` frames addressed to `destination`
    pub fn sent_to(&self, destination: &str) -> Vec<Value> {
        self.recorded()
            .into_iter()
            .filter_map(|entry| match entry {
                Recorded::Send {
                    destination: d,
                    body,
                    ..
                } if d == destination => Some(body),
                _ => None,
            })
            .collect()
    }

    /// REST calls as `"METHOD /path?query"`
    pub fn rest_calls(&self) -> Vec<String> {
        self.recorded()
            .into_iter()
            .filter_map(|entry| match entry {
                Recorded::Rest { method, path, .. } => Some(format!("{method} {path}")),
                _ => None,
            })
            .collect()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn user_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn history_handler(
    State(state): State<Arc<BrokerState>>,
    Path(room): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.record(Recorded::Rest {
        method: "GET",
        path: format!("/api/chat/room/{room}/messages"),
        user: user_header(&headers),
    });
    let entries = state
        .history
        .lock()
        .unwrap()
        .get(&room)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(entries))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToggleQuery {
    owner_id: String,
}

async fn toggle_write_handler(
    State(state): State<Arc<BrokerState>>,
    Path(room): Path<String>,
    Query(query): Query<ToggleQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.record(Recorded::Rest {
        method: "PUT",
        path: format!("/api/chat/room/{room}/toggleWrite?ownerId={}", query.owner_id),
        user: user_header(&headers),
    });
    let mut locks = state.write_locked.lock().unwrap();
    let locked = locks.entry(room).or_insert(false);
    *locked = !*locked;
    Json(json!({ "onlyOwnerCanWrite": *locked }))
}

async fn create_room_handler(
    State(state): State<Arc<BrokerState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = user_header(&headers);
    state.record(Recorded::Rest {
        method: "POST",
        path: "/api/chat/room".to_string(),
        user: user.clone(),
    });
    let mut created = state.created_rooms.lock().unwrap();
    *created += 1;
    Json(json!({
        "roomId": format!("room-{}", *created),
        "ownerId": user,
        "active": true,
        "onlyOwnerCanWrite": false,
    }))
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<BrokerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<BrokerState>) {
    let (mut sender, mut receiver) = socket.split();
    let (outbox, mut rx) = mpsc::unbounded_channel::<String>();

    let pusher = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(message)) = receiver.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let Ok(Some(frame)) = Frame::decode(text.as_str()) else {
            continue;
        };

        match frame.command {
            Command::Connect | Command::Stomp => {
                let connected = Frame::new(Command::Connected)
                    .header("version", "1.2")
                    .header("heart-beat", "0,0");
                outbox.send(connected.encode()).ok();
            }
            Command::Subscribe => {
                let (Some(id), Some(destination)) =
                    (frame.get_header("id"), frame.get_header("destination"))
                else {
                    continue;
                };
                state
                    .subscribers
                    .lock()
                    .unwrap()
                    .entry(destination.to_string())
                    .or_default()
                    .push((id.to_string(), outbox.clone()));
            }
            Command::Send => handle_send(&state, &frame),
            Command::Disconnect => {
                if let Some(receipt) = frame.get_header("receipt") {
                    let frame = Frame::new(Command::Receipt).header("receipt-id", receipt);
                    outbox.send(frame.encode()).ok();
                }
                break;
            }
            _ => {}
        }
    }

    // Forget this connection's subscriptions
    for targets in state.subscribers.lock().unwrap().values_mut() {
        targets.retain(|(_, target)| !target.same_channel(&outbox));
    }
    drop(outbox);
    pusher.await.ok();
}

/// Record a `SEND` and echo it to the room topic the way the backend does
fn handle_send(state: &BrokerState, frame: &Frame) {
    let destination = frame.get_header("destination").unwrap_or_default().to_string();
    let body: Value = serde_json::from_str(&frame.body).unwrap_or(Value::Null);
    state.record(Recorded::Send {
        destination: destination.clone(),
        user: frame.get_header("X-User-Id").map(str::to_string),
        body: body.clone(),
    });

    let sender = body["senderId"].as_str().unwrap_or_default().to_string();
    let room = body["roomId"].as_str().unwrap_or_default().to_string();
    let timestamp = charla_shared::time::now_millis();

    let echo = match destination.as_str() {
        "/app/chat.addUser" => json!({
            "senderId": sender,
            "roomId": room,
            "content": format!("{sender} se ha unido al chat!"),
            "type": "JOIN",
            "timestamp": timestamp,
        }),
        "/app/chat.sendMessage" => json!({
            "senderId": sender,
            "roomId": room,
            "content": body["content"],
            "type": "CHAT",
            "timestamp": timestamp,
        }),
        _ => return,
    };
    state.broadcast(&format!("/topic/{room}"), &echo.to_string());
}

/// Feed inbound frames to the session until `done` holds for its view
pub async fn pump_until(
    session: &mut Session<MessageLog>,
    done: impl Fn(&MessageLog) -> bool,
) -> Result<(), ClientError> {
    let pump = async {
        while !done(session.view()) {
            match session.next_frame().await {
                Some(Ok(body)) => {
                    let _ = session.handle_frame(&body);
                }
                Some(Err(e)) => return Err(ClientError::from(e)),
                None => {
                    return Err(ClientError::from(ChannelError::Closed));
                }
            }
        }
        Ok(())
    };
    tokio::time::timeout(Duration::from_secs(5), pump)
        .await
        .expect("timed out waiting for frames")
}

pub fn assert_connected(session: &Session<MessageLog>) {
    assert_eq!(session.state(), ConnectionState::Connected);
}
