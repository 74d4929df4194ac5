//! Domain logic for client-side operations.
//!
//! Pure functions without side effects: how to react to a broadcast, when to
//! reconnect, and how the server's endpoints are derived from its base URL.

use cowatch_server::domain::{
    BroadcastEvent, ConnectionId, PlaybackPosition, TransportState, VideoId, Volume,
};

use crate::error::ClientError;

/// One-time adoption of another participant's video.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSync {
    pub video_id: VideoId,
    pub timestamp: PlaybackPosition,
    /// The remote participant was paused; pause once the load has completed.
    pub pause_after_load: bool,
    pub volume: Volume,
    pub muted: bool,
}

/// Decision for one inbound broadcast.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Our own echo; the local view already reflects it.
    OwnEcho,
    /// Refresh the participant list only.
    Observe,
    /// Refresh the participant list and adopt the remote video.
    JoinSync(JoinSync),
}

/// Decide how to react to a broadcast.
///
/// `local_id` is `None` until the server has told us our identity; nothing
/// is treated as our own echo before that. Adoption only happens while no
/// video is loaded locally, so once synced the local participant drives its
/// own playback.
pub fn reconcile(
    local_id: Option<&ConnectionId>,
    local_has_video: bool,
    event: &BroadcastEvent,
) -> Reconciliation {
    if local_id == Some(&event.origin_id) {
        return Reconciliation::OwnEcho;
    }

    match (&event.state.video_id, local_has_video) {
        (Some(video_id), false) => Reconciliation::JoinSync(JoinSync {
            video_id: video_id.clone(),
            timestamp: event.state.timestamp,
            pause_after_load: event.state.transport_state == TransportState::Paused,
            volume: event.state.volume,
            muted: event.state.muted,
        }),
        _ => Reconciliation::Observe,
    }
}

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::InvalidServerUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Derive the WebSocket endpoint from the server's HTTP base URL.
///
/// `http://host:3000` becomes `ws://host:3000/ws`, `https://` becomes `wss://`.
pub fn websocket_url(server_url: &str) -> Result<String, ClientError> {
    let base = server_url.trim().trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else {
        return Err(ClientError::InvalidServerUrl(server_url.to_string()));
    };

    if ws_base.ends_with("://") {
        return Err(ClientError::InvalidServerUrl(server_url.to_string()));
    }
    Ok(format!("{}/ws", ws_base))
}
