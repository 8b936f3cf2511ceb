//! Infrastructure layer: wire DTOs and concrete transports.

pub mod dto;
pub mod http;
pub mod stomp;

/// Header the backend reads the acting user from (STOMP and REST)
pub const USER_HEADER: &str = "X-User-Id";
