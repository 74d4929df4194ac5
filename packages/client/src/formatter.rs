//! Message formatting utilities for client display.

use cowatch_server::{
    domain::{ParticipantState, TransportState},
    infrastructure::dto::{
        http::{ParticipantEntryDto, VideoDetailsDto, VideoSummaryDto},
        websocket::TransportStateDto,
    },
};
use cowatch_shared::time::{format_playback_time, parse_iso8601_duration};

use crate::player::LoadedVideo;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the participant list.
    ///
    /// The local participant is shown as "You", others as `Client` plus the
    /// first four characters of their id.
    pub fn format_participant_list(
        participants: &[ParticipantEntryDto],
        local_id: Option<&str>,
    ) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        output.push_str(&format!("Participants ({}):\n", participants.len()));

        if participants.is_empty() {
            output.push_str("(No participants)\n");
        }
        for participant in participants {
            let label = Self::participant_label(&participant.id, local_id);
            let badge = Self::status_badge(participant.state.transport_state);
            output.push_str(&format!("  {:<12} [{}]", label, badge));
            if let Some(video_id) = &participant.state.video_id {
                output.push_str(&format!(
                    "  Video: {} @ {}",
                    video_id,
                    format_playback_time(participant.state.timestamp)
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!("{}\n", RULE));
        output
    }

    pub fn participant_label(id: &str, local_id: Option<&str>) -> String {
        if local_id == Some(id) {
            "You".to_string()
        } else {
            format!("Client {}", id.chars().take(4).collect::<String>())
        }
    }

    pub fn status_badge(state: TransportStateDto) -> &'static str {
        match state {
            TransportStateDto::Playing => "Playing",
            TransportStateDto::Paused => "Paused",
            TransportStateDto::Stopped => "Idle",
        }
    }

    /// `current / duration (percent)`, or just the current position when the
    /// duration is unknown.
    pub fn format_progress(position: f64, duration: Option<f64>) -> String {
        match duration {
            Some(duration) if duration > 0.0 => {
                let percent = (position / duration * 100.0).clamp(0.0, 100.0);
                format!(
                    "{} / {} ({:.0}%)",
                    format_playback_time(position),
                    format_playback_time(duration),
                    percent
                )
            }
            _ => format_playback_time(position),
        }
    }

    /// Format the local player's status.
    pub fn format_status(snapshot: &ParticipantState, video: Option<&LoadedVideo>) -> String {
        let state = match snapshot.transport_state {
            TransportState::Playing => "Playing",
            TransportState::Paused => "Paused",
            TransportState::Stopped => "Stopped",
        };
        let sound = if snapshot.muted {
            format!("volume {} (muted)", snapshot.volume.value())
        } else {
            format!("volume {}", snapshot.volume.value())
        };

        match video {
            Some(video) => format!(
                "\nNow: {} ({})\n[{}] {}  {}\n",
                video.title.as_deref().unwrap_or("Unknown title"),
                video.id,
                state,
                Self::format_progress(snapshot.timestamp.seconds(), video.duration),
                sound
            ),
            None => format!("\nNo video loaded  {}\n", sound),
        }
    }

    pub fn format_video_details(details: &VideoDetailsDto) -> String {
        let duration = parse_iso8601_duration(&details.duration)
            .map(format_playback_time)
            .unwrap_or_else(|| details.duration.clone());
        format!(
            "\n{}\n  id:       {}\n  channel:  {}\n  duration: {}\n  {}\n",
            details.title, details.id, details.channel_title, duration, details.thumbnail_url
        )
    }

    pub fn format_search_results(results: &[VideoSummaryDto]) -> String {
        if results.is_empty() {
            return "\nNo results found\n".to_string();
        }

        let mut output = String::from("\n");
        for (index, video) in results.iter().enumerate() {
            output.push_str(&format!(
                "{:>2}. {}  [{}]\n    {}\n",
                index + 1,
                video.title,
                video.id,
                video.channel_title
            ));
        }
        output.push_str("Use 'load <videoId>' to watch one.\n");
        output
    }

    pub fn format_join_sync(video_id: &str, position: f64, paused: bool) -> String {
        let action = if paused { "paused" } else { "playing" };
        format!(
            "\n↻ Synced to {} at {} ({})\n",
            video_id,
            format_playback_time(position),
            action
        )
    }

    pub fn format_help() -> String {
        [
            "",
            "Commands:",
            "  load <videoId> [seconds]  load a video and start playing",
            "  play | pause | stop       transport controls",
            "  seek <seconds>            jump to a position",
            "  volume <0-100>            set the volume",
            "  mute | unmute             toggle sound",
            "  search <query>            search videos",
            "  info <videoId>            show video details",
            "  list                      show participants",
            "  status                    show the local player",
            "  help                      show this help",
            "  quit                      leave the session",
            "",
        ]
        .join("\n")
    }
}
