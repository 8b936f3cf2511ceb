//! Chat session: connection lifecycle, room subscription and history replay.

pub mod command;
pub mod history;
pub mod manager;
pub mod subscriber;

#[cfg(test)]
pub(crate) mod testing;

pub use command::UserCommand;
pub use manager::Session;
