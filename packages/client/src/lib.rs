//! STOMP-over-WebSocket chat client library.
//!
//! A [`Session`](session::Session) logs a user into a room, subscribes to the
//! room topic, announces the user, replays the room history and then renders
//! live events into a [`MessageArea`](ui::MessageArea).

// layers
pub mod domain;
pub mod infrastructure;
pub mod session;
pub mod ui;

// client plumbing
pub mod config;
pub mod error;
pub mod login;
pub mod runner;

pub use config::ClientConfig;
pub use error::ClientError;
pub use login::{LoginForm, LoginRequest, RoomChoice};
pub use runner::{prepare_session, run_client};
