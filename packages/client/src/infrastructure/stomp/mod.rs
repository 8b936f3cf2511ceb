//! STOMP over WebSocket.

pub mod channel;
pub mod frame;

pub use channel::StompChannel;
pub use frame::{Command, Frame, FrameError};
