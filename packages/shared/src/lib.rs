//! Shared utilities for the Charla chat client packages.

pub mod logger;
pub mod time;
