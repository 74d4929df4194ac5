//! Domain error types.

use thiserror::Error;

/// A value failed validation while being turned into a domain value.
///
/// Raised for malformed inbound commands; the command is dropped and the
/// connection stays open.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("invalid video id: '{0}'")]
    InvalidVideoId(String),

    #[error("playback position must be a finite number of seconds >= 0 (got {0})")]
    InvalidPosition(f64),

    #[error("volume must be within 0..=100 (got {0})")]
    VolumeOutOfRange(i64),

    #[error("search query must not be blank")]
    EmptySearchQuery,

    #[error("missing required field '{field}' for '{command}'")]
    MissingField {
        command: &'static str,
        field: &'static str,
    },
}

/// A command was well-formed but cannot be applied to the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// `play`/`pause` would leave a participant non-stopped without a video.
    #[error("'{0}' requires a loaded video")]
    NoVideoLoaded(&'static str),
}

/// Errors raised by the participant registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("participant '{0}' not found")]
    ParticipantNotFound(String),

    #[error("participant '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("transition rejected: {0}")]
    Rejected(#[from] TransitionError),
}

/// Errors raised while pushing events to connections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    EncodeFailed(String),
}

/// Errors raised by the external video catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("video '{0}' not found")]
    NotFound(String),

    #[error("video catalog unavailable: {0}")]
    UpstreamUnavailable(String),
}
