//! Playback state machine.
//!
//! Every participant owns one [`ParticipantState`]. It is mutated only by
//! [`PlaybackCommand`]s sent over that participant's own connection.
//!
//! ```text
//!            play                 pause
//! stopped ---------> playing <-----------> paused
//!    ^                  |         play        |
//!    |       stop       |                     |
//!    +------------------+---------------------+
//! ```
//!
//! `seek`, `volume`, `mute` and `updateTimestamp` never change the transport
//! state. Optional command fields are `Option`s: an absent field leaves the
//! current value untouched, while an explicit `0`/`false` is applied.

use serde::{Deserialize, Serialize};

use super::{
    error::TransitionError,
    value_object::{PlaybackPosition, VideoId, Volume},
};

/// Playback phase of a participant's video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl TransportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

/// Playback state of one participant.
///
/// Invariant: `video_id == None` implies `transport_state == Stopped`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticipantState {
    pub video_id: Option<VideoId>,
    pub transport_state: TransportState,
    pub timestamp: PlaybackPosition,
    pub volume: Volume,
    pub muted: bool,
}

impl ParticipantState {
    pub fn has_video(&self) -> bool {
        self.video_id.is_some()
    }

    /// Apply a command to this state.
    ///
    /// The state is left untouched when the transition is rejected.
    pub fn apply(&mut self, command: &PlaybackCommand) -> Result<(), TransitionError> {
        match command {
            PlaybackCommand::Play {
                video_id,
                timestamp,
            } => {
                if video_id.is_none() && self.video_id.is_none() {
                    return Err(TransitionError::NoVideoLoaded(command.name()));
                }
                self.transport_state = TransportState::Playing;
                if let Some(video_id) = video_id {
                    self.video_id = Some(video_id.clone());
                }
                if let Some(timestamp) = timestamp {
                    self.timestamp = *timestamp;
                }
            }
            PlaybackCommand::Pause { timestamp } => {
                if self.video_id.is_none() {
                    return Err(TransitionError::NoVideoLoaded(command.name()));
                }
                self.transport_state = TransportState::Paused;
                if let Some(timestamp) = timestamp {
                    self.timestamp = *timestamp;
                }
            }
            PlaybackCommand::Stop => {
                // video identity is kept so a bare `play` resumes the same video
                self.transport_state = TransportState::Stopped;
                self.timestamp = PlaybackPosition::ZERO;
            }
            PlaybackCommand::Seek { timestamp } | PlaybackCommand::UpdateTimestamp { timestamp } => {
                self.timestamp = *timestamp;
            }
            PlaybackCommand::Volume { volume } => {
                self.volume = *volume;
            }
            PlaybackCommand::Mute { muted } => {
                self.muted = *muted;
            }
        }
        Ok(())
    }
}

/// Inbound command from a participant, already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    Play {
        video_id: Option<VideoId>,
        timestamp: Option<PlaybackPosition>,
    },
    Pause {
        timestamp: Option<PlaybackPosition>,
    },
    Stop,
    Seek {
        timestamp: PlaybackPosition,
    },
    Volume {
        volume: Volume,
    },
    Mute {
        muted: bool,
    },
    /// Periodic position heartbeat from a playing participant.
    UpdateTimestamp {
        timestamp: PlaybackPosition,
    },
}

impl PlaybackCommand {
    /// Wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play { .. } => "play",
            Self::Pause { .. } => "pause",
            Self::Stop => "stop",
            Self::Seek { .. } => "seek",
            Self::Volume { .. } => "volume",
            Self::Mute { .. } => "mute",
            Self::UpdateTimestamp { .. } => "updateTimestamp",
        }
    }

    /// Whether an accepted command is published to every participant.
    ///
    /// Heartbeats update the registry silently.
    pub fn broadcasts(&self) -> bool {
        !matches!(self, Self::UpdateTimestamp { .. })
    }
}
