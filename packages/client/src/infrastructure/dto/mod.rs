//! Data Transfer Objects (DTOs) for the chat client.
//!
//! DTOs are organized by protocol:
//! - `websocket`: payloads carried in STOMP frame bodies
//! - `http`: REST API response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
