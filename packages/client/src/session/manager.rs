//! Session manager.
//!
//! Owns the identity and the connection lifecycle, and drives the single
//! event loop that interleaves inbound frames with user commands:
//!
//! ```text
//! Disconnected --connect--> Connecting --transport up--> Connected
//! Connected --disconnect / transport error--> Disconnected
//! ```

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;

use crate::{
    domain::{
        ChannelError, ChatApi, ChatEvent, ConnectionState, Identity, MessageChannel,
        MessageContent, RoomPermission, Subscription,
    },
    error::ClientError,
    ui::{MessageArea, PermissionControl, render_event},
};

use super::{UserCommand, history, subscriber};

/// A logged-in chat session
pub struct Session<V: MessageArea> {
    identity: Identity,
    state: ConnectionState,
    channel: Box<dyn MessageChannel>,
    api: Arc<dyn ChatApi>,
    view: V,
    permission: PermissionControl,
    /// The room subscription; present exactly while connected
    subscription: Option<Subscription>,
    connect_timeout: Option<Duration>,
}

enum Step {
    Frame(Option<Result<String, ChannelError>>),
    Command(Option<UserCommand>),
}

impl<V: MessageArea> Session<V> {
    /// Create the session for a validated identity. Nothing is connected yet.
    pub fn login(
        identity: Identity,
        channel: Box<dyn MessageChannel>,
        api: Arc<dyn ChatApi>,
        view: V,
    ) -> Self {
        tracing::debug!(
            "Session created for '{}' in room '{}'",
            identity.user_name,
            identity.room_id
        );
        Self {
            identity,
            state: ConnectionState::Disconnected,
            channel,
            api,
            view,
            permission: PermissionControl::default(),
            subscription: None,
            connect_timeout: None,
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Seed the permission control with a state the backend reported
    #[must_use]
    pub fn with_permission(mut self, permission: RoomPermission) -> Self {
        self.permission = PermissionControl::new(permission);
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn permission_control(&self) -> &PermissionControl {
        &self.permission
    }

    /// Connect, subscribe to the room, announce the user and replay history.
    ///
    /// Exactly one JOIN is published per successful connection. A failed
    /// history load is logged and does not fail the connection.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        if self.state != ConnectionState::Disconnected {
            tracing::debug!("connect() ignored while {}", self.state);
            return Ok(());
        }

        self.state = ConnectionState::Connecting;
        tracing::info!(
            "Connecting to room '{}' as '{}'",
            self.identity.room_id,
            self.identity.user_name
        );

        let connected = match self.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.channel.connect())
                .await
                .unwrap_or(Err(ChannelError::Timeout(timeout))),
            None => self.channel.connect().await,
        };
        if let Err(e) = connected {
            self.state = ConnectionState::Disconnected;
            tracing::error!("Connection failed: {}", e);
            return Err(e.into());
        }

        let subscription =
            match subscriber::subscribe_room(self.channel.as_mut(), &self.identity.room_id).await
            {
                Ok(subscription) => subscription,
                Err(e) => return Err(self.abort_connect(e.into()).await),
            };
        tracing::debug!(
            "Listening on '{}' as '{}'",
            subscription.destination(),
            subscription.id()
        );
        self.subscription = Some(subscription);

        if let Err(e) = subscriber::announce_join(self.channel.as_mut(), &self.identity).await {
            return Err(self.abort_connect(e).await);
        }

        self.state = ConnectionState::Connected;
        tracing::info!("Connected to room '{}'", self.identity.room_id);

        // Logged inside; the session stays usable without a backlog.
        let _ = self.load_history().await;
        Ok(())
    }

    /// Release a half-open connection after a failed connect step
    async fn abort_connect(&mut self, error: ClientError) -> ClientError {
        tracing::error!("Connection setup failed: {}", error);
        self.subscription = None;
        if let Err(e) = self.channel.disconnect().await {
            tracing::debug!("Teardown after failed connect: {}", e);
        }
        self.state = ConnectionState::Disconnected;
        error
    }

    /// Tear down the connection. Safe to call when already disconnected.
    pub async fn disconnect(&mut self) -> Result<(), ClientError> {
        if self.state == ConnectionState::Disconnected {
            tracing::debug!("disconnect() ignored, no active connection");
            return Ok(());
        }

        self.subscription = None;
        self.state = ConnectionState::Disconnected;
        self.channel.disconnect().await?;
        tracing::info!("Left room '{}'", self.identity.room_id);
        Ok(())
    }

    /// Mark the connection as lost after a transport failure
    pub async fn connection_lost(&mut self, reason: &ChannelError) {
        tracing::warn!("Connection lost: {}", reason);
        self.subscription = None;
        self.state = ConnectionState::Disconnected;
        if let Err(e) = self.channel.disconnect().await {
            tracing::debug!("Teardown after connection loss: {}", e);
        }
    }

    /// Fetch the room backlog and render it in order.
    ///
    /// Returns the number of events replayed. On failure nothing is rendered.
    pub async fn load_history(&mut self) -> Result<usize, ClientError> {
        let api = Arc::clone(&self.api);
        match history::fetch_history(api.as_ref(), &self.identity).await {
            Ok(events) => {
                let rendered = events.iter().filter(|e| self.render(e)).count();
                tracing::info!("Replayed {} history messages", rendered);
                Ok(rendered)
            }
            Err(e) => {
                tracing::error!("Error loading messages: {}", e);
                Err(e.into())
            }
        }
    }

    /// Send a chat message from the compose form.
    ///
    /// Returns `Ok(false)` when nothing was sent (blank input or no connection).
    pub async fn send_message(&mut self, raw: &str) -> Result<bool, ClientError> {
        let Ok(content) = MessageContent::new(raw) else {
            return Ok(false);
        };
        if !self.state.is_connected() {
            tracing::debug!("Message dropped, session is {}", self.state);
            return Ok(false);
        }

        let published =
            subscriber::publish_chat(self.channel.as_mut(), &self.identity, content).await;
        if let Err(e) = published {
            tracing::warn!("Failed to send message: {}", e);
            return Err(e);
        }
        Ok(true)
    }

    /// Ask the backend to flip the room's write restriction.
    ///
    /// Inert for non-owners (`Ok(None)`, no request). The control is updated
    /// only from a successful response, and the view only when it changed.
    pub async fn toggle_permission(&mut self) -> Result<Option<RoomPermission>, ClientError> {
        if !self.identity.is_owner {
            tracing::debug!(
                "Permission toggle ignored, '{}' is not the owner",
                self.identity.user_name
            );
            return Ok(None);
        }

        let api = Arc::clone(&self.api);
        match api
            .toggle_write(&self.identity.room_id, &self.identity.user_name)
            .await
        {
            Ok(permission) => {
                if self.permission.apply(permission) {
                    self.view.show_permission(&self.permission);
                    tracing::info!("Write permission is now '{}'", self.permission.label());
                } else {
                    tracing::debug!(
                        "Write permission unchanged ('{}')",
                        self.permission.label()
                    );
                }
                Ok(Some(permission))
            }
            Err(e) => {
                tracing::error!("Error toggling write permission: {}", e);
                Err(e.into())
            }
        }
    }

    /// Wait for the next inbound frame of the room subscription
    pub async fn next_frame(&mut self) -> Option<Result<String, ChannelError>> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next_frame().await,
            None => None,
        }
    }

    /// Decode and render one inbound frame.
    ///
    /// A malformed frame is logged and reported; it never ends the subscription.
    pub fn handle_frame(&mut self, body: &str) -> Result<(), ClientError> {
        let event = match subscriber::decode_event(body) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Dropping malformed frame: {}", e);
                return Err(e.into());
            }
        };

        if !self.render(&event) {
            return Err(ClientError::ForeignRoom {
                event_room: event.room_id.unwrap_or_default(),
                session_room: self.identity.room_id.to_string(),
            });
        }
        Ok(())
    }

    /// Append an event to the view and scroll to it. Returns `false` when the
    /// event belongs to another room and was dropped.
    fn render(&mut self, event: &ChatEvent) -> bool {
        if !event.belongs_to(self.identity.room_id.as_str()) {
            tracing::warn!(
                "Dropping event for room {:?} in room '{}'",
                event.room_id,
                self.identity.room_id
            );
            return false;
        }

        let node = render_event(event, &self.identity.user_name);
        self.view.append(node);
        self.view.scroll_to_latest();
        true
    }

    /// Run the event loop until the user quits or the transport goes away.
    ///
    /// Each inbound frame and each command is handled to completion before
    /// the next one is taken.
    pub async fn run(
        &mut self,
        commands: &mut mpsc::UnboundedReceiver<UserCommand>,
    ) -> Result<(), ClientError> {
        loop {
            let step = tokio::select! {
                frame = self.next_frame() => Step::Frame(frame),
                command = commands.recv() => Step::Command(command),
            };

            match step {
                Step::Frame(Some(Ok(body))) => {
                    let _ = self.handle_frame(&body);
                }
                Step::Frame(Some(Err(e))) => {
                    self.connection_lost(&e).await;
                    return Err(e.into());
                }
                Step::Frame(None) => {
                    self.connection_lost(&ChannelError::Closed).await;
                    return Err(ChannelError::Closed.into());
                }
                Step::Command(Some(UserCommand::Send(text))) => {
                    let _ = self.send_message(&text).await;
                }
                Step::Command(Some(UserCommand::TogglePermission)) => {
                    let _ = self.toggle_permission().await;
                }
                Step::Command(Some(UserCommand::Quit) | None) => {
                    self.disconnect().await?;
                    return Ok(());
                }
            }
        }
    }
}
