//! Client-side synchronization logic.
//!
//! [`SyncController`] owns the local player and reacts to three sources of
//! events: broadcasts from the server, lines typed by the user, and the
//! one-second playback tick. Every handler returns the text to print, so the
//! session loop stays free of decisions.
//!
//! The controller outlives a single connection. The session attaches the
//! outbound channel when it connects and detaches it when the connection
//! drops; commands issued in between are applied locally only.

use std::{sync::Arc, time::Instant};

use cowatch_server::domain::{
    BroadcastEvent, ConnectionId, PlaybackCommand, PlaybackPosition, TransportState, VideoId,
    Volume,
};
use cowatch_shared::time::parse_iso8601_duration;
use tokio::sync::mpsc;

use crate::{
    api::SessionApi,
    domain::{JoinSync, Reconciliation, reconcile},
    error::ClientError,
    formatter::MessageFormatter,
    input::UserCommand,
    player::{LoadedVideo, LocalPlayer},
};

/// Outcome of a user command.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue(String),
    Quit,
}

pub struct SyncController {
    player: LocalPlayer,
    local_id: Option<ConnectionId>,
    api: Arc<dyn SessionApi>,
    outbound: Option<mpsc::UnboundedSender<PlaybackCommand>>,
}

impl SyncController {
    pub fn new(api: Arc<dyn SessionApi>) -> Self {
        Self {
            player: LocalPlayer::new(),
            local_id: None,
            api,
            outbound: None,
        }
    }

    /// Route outbound commands to a live connection.
    pub fn attach(&mut self, outbound: mpsc::UnboundedSender<PlaybackCommand>) {
        self.outbound = Some(outbound);
    }

    /// Forget the connection and the identity it assigned.
    pub fn detach(&mut self) {
        self.outbound = None;
        self.local_id = None;
    }

    pub fn local_id(&self) -> Option<&ConnectionId> {
        self.local_id.as_ref()
    }

    pub fn player(&self) -> &LocalPlayer {
        &self.player
    }

    /// The server told us who we are.
    ///
    /// A fresh identity starts from the default state on the server, so a
    /// player that survived a reconnect re-announces itself before the
    /// participant list is pulled.
    pub async fn on_connected(&mut self, connection_id: ConnectionId, now: Instant) -> String {
        tracing::info!("Connected as {}", connection_id);
        self.local_id = Some(connection_id);
        self.announce(now);
        self.participant_list().await
    }

    /// React to another participant's state change.
    pub async fn on_state_update(&mut self, event: &BroadcastEvent, now: Instant) -> String {
        match reconcile(self.local_id.as_ref(), self.player.has_video(), event) {
            Reconciliation::OwnEcho => String::new(),
            Reconciliation::Observe => self.participant_list().await,
            Reconciliation::JoinSync(sync) => {
                let list = self.participant_list().await;
                let synced = self.join_sync(sync, now).await;
                format!("{}{}", list, synced)
            }
        }
    }

    pub async fn on_user_command(&mut self, command: UserCommand, now: Instant) -> Flow {
        let output = match command {
            UserCommand::Load { video_id, start_at } => {
                let video_id = match VideoId::new(video_id) {
                    Ok(video_id) => video_id,
                    Err(e) => return Flow::Continue(format!("{}\n", e)),
                };
                let start_at = match PlaybackPosition::new(start_at) {
                    Ok(position) => position,
                    Err(e) => return Flow::Continue(format!("{}\n", e)),
                };
                self.load_video(video_id, start_at, now).await
            }
            UserCommand::Play => match self.player.play(now) {
                Ok(position) => {
                    self.emit(PlaybackCommand::Play {
                        video_id: self.player.video_id().cloned(),
                        timestamp: Some(position),
                    });
                    self.status(now)
                }
                Err(e) => format!("{}\n", e),
            },
            UserCommand::Pause => match self.player.pause(now) {
                Ok(position) => {
                    self.emit(PlaybackCommand::Pause {
                        timestamp: Some(position),
                    });
                    self.status(now)
                }
                Err(e) => format!("{}\n", e),
            },
            UserCommand::Stop => {
                if self.player.has_video() {
                    self.player.stop();
                    self.emit(PlaybackCommand::Stop);
                    self.status(now)
                } else {
                    format!("{}\n", ClientError::NoVideoSelected)
                }
            }
            UserCommand::Seek(seconds) => {
                let outcome = PlaybackPosition::new(seconds)
                    .map_err(|e| e.to_string())
                    .and_then(|position| {
                        self.player
                            .seek(position, now)
                            .map_err(|e| e.to_string())
                    });
                match outcome {
                    Ok(()) => {
                        self.emit(PlaybackCommand::Seek {
                            timestamp: self.player.position_at(now),
                        });
                        self.status(now)
                    }
                    Err(e) => format!("{}\n", e),
                }
            }
            UserCommand::Volume(value) => match Volume::new(value) {
                Ok(volume) => {
                    self.player.set_volume(volume);
                    self.emit(PlaybackCommand::Volume { volume });
                    self.status(now)
                }
                Err(e) => format!("{}\n", e),
            },
            UserCommand::Mute => self.set_muted(true, now),
            UserCommand::Unmute => self.set_muted(false, now),
            UserCommand::Search(query) => match self.api.search_videos(&query).await {
                Ok(results) => MessageFormatter::format_search_results(&results),
                Err(e) => format!("Search failed: {}\n", e),
            },
            UserCommand::Info(video_id) => match self.api.lookup_video(&video_id).await {
                Ok(Some(details)) => MessageFormatter::format_video_details(&details),
                Ok(None) => "Video not found\n".to_string(),
                Err(e) => format!("Lookup failed: {}\n", e),
            },
            UserCommand::List => self.participant_list().await,
            UserCommand::Status => self.status(now),
            UserCommand::Help => MessageFormatter::format_help(),
            UserCommand::Quit => return Flow::Quit,
        };
        Flow::Continue(output)
    }

    /// One-second playback tick.
    ///
    /// Reports the position while playing. Reaching the end of a video of
    /// known length stops it, the way the embedded player's "ended" event does.
    pub fn on_tick(&mut self, now: Instant) -> Option<String> {
        if !self.player.is_playing() {
            return None;
        }

        if self.player.has_ended(now) {
            self.player.stop();
            self.emit(PlaybackCommand::Stop);
            return Some("\n■ Video ended\n".to_string());
        }

        self.emit(PlaybackCommand::UpdateTimestamp {
            timestamp: self.player.position_at(now),
        });
        None
    }

    /// Replay the local player onto the server-side state.
    fn announce(&self, now: Instant) {
        if let Some(video_id) = self.player.video_id().cloned() {
            let position = self.player.position_at(now);
            tracing::info!("Re-announcing {} at {:.1}s", video_id, position.seconds());
            self.emit(PlaybackCommand::Play {
                video_id: Some(video_id),
                timestamp: Some(position),
            });
            match self.player.transport_state() {
                TransportState::Playing => {}
                TransportState::Paused => self.emit(PlaybackCommand::Pause {
                    timestamp: Some(position),
                }),
                TransportState::Stopped => self.emit(PlaybackCommand::Stop),
            }
        }
        if self.player.volume() != Volume::default() {
            self.emit(PlaybackCommand::Volume {
                volume: self.player.volume(),
            });
        }
        if self.player.is_muted() {
            self.emit(PlaybackCommand::Mute { muted: true });
        }
    }

    async fn join_sync(&mut self, sync: JoinSync, now: Instant) -> String {
        let JoinSync {
            video_id,
            timestamp,
            pause_after_load,
            volume,
            muted,
        } = sync;
        tracing::info!(
            "Join-sync: adopting {} at {:.1}s (pause: {})",
            video_id,
            timestamp.seconds(),
            pause_after_load
        );

        let video_label = video_id.to_string();
        self.load_video(video_id, timestamp, now).await;

        // the load above has settled, so the pause takes effect
        if pause_after_load
            && let Ok(position) = self.player.pause(now)
        {
            self.emit(PlaybackCommand::Pause {
                timestamp: Some(position),
            });
        }

        self.player.set_volume(volume);
        self.player.set_muted(muted);

        MessageFormatter::format_join_sync(&video_label, timestamp.seconds(), pause_after_load)
    }

    /// Cue a video, starting playback, and announce it.
    ///
    /// The title lookup is best effort; the video loads either way.
    async fn load_video(
        &mut self,
        video_id: VideoId,
        start_at: PlaybackPosition,
        now: Instant,
    ) -> String {
        let (title, duration) = match self.api.lookup_video(video_id.as_str()).await {
            Ok(Some(details)) => {
                let duration = parse_iso8601_duration(&details.duration);
                (Some(details.title), duration)
            }
            Ok(None) => {
                tracing::warn!("No metadata for video {}", video_id);
                (None, None)
            }
            Err(e) => {
                tracing::warn!("Video lookup failed for {}: {}", video_id, e);
                (None, None)
            }
        };

        self.player.load(
            LoadedVideo {
                id: video_id.clone(),
                title,
                duration,
            },
            start_at,
            now,
        );
        self.emit(PlaybackCommand::Play {
            video_id: Some(video_id),
            timestamp: Some(start_at),
        });
        self.status(now)
    }

    async fn participant_list(&self) -> String {
        match self.api.list_participants().await {
            Ok(participants) => MessageFormatter::format_participant_list(
                &participants,
                self.local_id.as_ref().map(|id| id.as_str()),
            ),
            Err(e) => {
                tracing::warn!("Failed to refresh participants: {}", e);
                format!("Could not refresh participants: {}\n", e)
            }
        }
    }

    fn set_muted(&mut self, muted: bool, now: Instant) -> String {
        self.player.set_muted(muted);
        self.emit(PlaybackCommand::Mute { muted });
        self.status(now)
    }

    fn status(&self, now: Instant) -> String {
        MessageFormatter::format_status(&self.player.snapshot(now), self.player.video())
    }

    fn emit(&self, command: PlaybackCommand) {
        match &self.outbound {
            Some(outbound) => {
                if outbound.send(command).is_err() {
                    tracing::warn!("Connection closed; command applied locally only");
                }
            }
            None => tracing::debug!("Not connected; {} applied locally only", command.name()),
        }
    }
}
