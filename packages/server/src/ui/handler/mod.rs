//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{debug_session, health_check, list_participants, lookup_video, search_videos};
pub use websocket::websocket_handler;
