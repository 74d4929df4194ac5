//! Utilities shared by the cowatch server and client.

pub mod logger;
pub mod time;
