//! Data Transfer Objects (DTOs) for cowatch.
//!
//! DTOs are organized by protocol:
//! - `websocket`: real-time channel messages
//! - `http`: HTTP API request/response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
