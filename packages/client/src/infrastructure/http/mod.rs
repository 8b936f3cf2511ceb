//! REST client for the chat backend.

pub mod api;

pub use api::HttpChatApi;
