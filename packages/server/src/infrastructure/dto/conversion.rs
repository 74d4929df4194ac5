//! Conversion logic between DTOs and domain types.

use cowatch_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    BroadcastEvent, ConnectionId, OutboundEvent, Participant, ParticipantState, PlaybackCommand,
    PlaybackPosition, TransportState, ValidationError, VideoDetails, VideoId, VideoSummary, Volume,
};
use crate::infrastructure::dto::{http, websocket as ws};

fn required<T>(
    value: Option<T>,
    command: &'static str,
    field: &'static str,
) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { command, field })
}

fn position(seconds: Option<f64>) -> Result<Option<PlaybackPosition>, ValidationError> {
    seconds.map(PlaybackPosition::new).transpose()
}

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<ws::InboundMessage> for PlaybackCommand {
    type Error = ValidationError;

    fn try_from(dto: ws::InboundMessage) -> Result<Self, Self::Error> {
        let command = match dto {
            ws::InboundMessage::Play {
                video_id,
                timestamp,
            } => Self::Play {
                video_id: video_id.map(VideoId::new).transpose()?,
                timestamp: position(timestamp)?,
            },
            ws::InboundMessage::Pause { timestamp } => Self::Pause {
                timestamp: position(timestamp)?,
            },
            ws::InboundMessage::Stop => Self::Stop,
            ws::InboundMessage::Seek { timestamp } => Self::Seek {
                timestamp: PlaybackPosition::new(required(timestamp, "seek", "timestamp")?)?,
            },
            ws::InboundMessage::Volume { volume } => Self::Volume {
                volume: Volume::new(required(volume, "volume", "volume")?)?,
            },
            ws::InboundMessage::Mute { muted } => Self::Mute {
                muted: required(muted, "mute", "muted")?,
            },
            ws::InboundMessage::UpdateTimestamp { timestamp } => Self::UpdateTimestamp {
                timestamp: PlaybackPosition::new(required(
                    timestamp,
                    "updateTimestamp",
                    "timestamp",
                )?)?,
            },
        };
        Ok(command)
    }
}

impl From<ws::TransportStateDto> for TransportState {
    fn from(dto: ws::TransportStateDto) -> Self {
        match dto {
            ws::TransportStateDto::Stopped => Self::Stopped,
            ws::TransportStateDto::Playing => Self::Playing,
            ws::TransportStateDto::Paused => Self::Paused,
        }
    }
}

impl TryFrom<ws::ParticipantStateDto> for ParticipantState {
    type Error = ValidationError;

    fn try_from(dto: ws::ParticipantStateDto) -> Result<Self, Self::Error> {
        Ok(Self {
            video_id: dto.video_id.map(VideoId::new).transpose()?,
            transport_state: dto.transport_state.into(),
            timestamp: PlaybackPosition::new(dto.timestamp)?,
            volume: Volume::new(i64::from(dto.volume))?,
            muted: dto.muted,
        })
    }
}

impl TryFrom<ws::OutboundMessage> for OutboundEvent {
    type Error = ValidationError;

    fn try_from(dto: ws::OutboundMessage) -> Result<Self, Self::Error> {
        let event = match dto {
            ws::OutboundMessage::Connected { connection_id } => Self::Connected {
                connection_id: ConnectionId::new(connection_id)?,
            },
            ws::OutboundMessage::StateUpdate { origin_id, state } => {
                Self::StateUpdate(BroadcastEvent {
                    origin_id: ConnectionId::new(origin_id)?,
                    state: state.try_into()?,
                })
            }
        };
        Ok(event)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&PlaybackCommand> for ws::InboundMessage {
    fn from(command: &PlaybackCommand) -> Self {
        match command {
            PlaybackCommand::Play {
                video_id,
                timestamp,
            } => Self::Play {
                video_id: video_id.as_ref().map(|id| id.as_str().to_string()),
                timestamp: timestamp.map(|t| t.seconds()),
            },
            PlaybackCommand::Pause { timestamp } => Self::Pause {
                timestamp: timestamp.map(|t| t.seconds()),
            },
            PlaybackCommand::Stop => Self::Stop,
            PlaybackCommand::Seek { timestamp } => Self::Seek {
                timestamp: Some(timestamp.seconds()),
            },
            PlaybackCommand::Volume { volume } => Self::Volume {
                volume: Some(i64::from(volume.value())),
            },
            PlaybackCommand::Mute { muted } => Self::Mute {
                muted: Some(*muted),
            },
            PlaybackCommand::UpdateTimestamp { timestamp } => Self::UpdateTimestamp {
                timestamp: Some(timestamp.seconds()),
            },
        }
    }
}

impl From<TransportState> for ws::TransportStateDto {
    fn from(state: TransportState) -> Self {
        match state {
            TransportState::Stopped => Self::Stopped,
            TransportState::Playing => Self::Playing,
            TransportState::Paused => Self::Paused,
        }
    }
}

impl From<&ParticipantState> for ws::ParticipantStateDto {
    fn from(state: &ParticipantState) -> Self {
        Self {
            video_id: state.video_id.as_ref().map(|id| id.as_str().to_string()),
            transport_state: state.transport_state.into(),
            timestamp: state.timestamp.seconds(),
            volume: state.volume.value(),
            muted: state.muted,
        }
    }
}

impl From<&OutboundEvent> for ws::OutboundMessage {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::Connected { connection_id } => Self::Connected {
                connection_id: connection_id.as_str().to_string(),
            },
            OutboundEvent::StateUpdate(BroadcastEvent { origin_id, state }) => Self::StateUpdate {
                origin_id: origin_id.as_str().to_string(),
                state: state.into(),
            },
        }
    }
}

impl From<Participant> for http::ParticipantEntryDto {
    fn from(participant: Participant) -> Self {
        Self {
            state: (&participant.state).into(),
            connected_at: timestamp_to_rfc3339(participant.connected_at.value()),
            id: participant.id.into_string(),
        }
    }
}

impl From<VideoDetails> for http::VideoDetailsDto {
    fn from(details: VideoDetails) -> Self {
        Self {
            id: details.id.into_string(),
            title: details.title,
            description: details.description,
            thumbnail_url: details.thumbnail_url,
            duration: details.duration,
            channel_title: details.channel_title,
        }
    }
}

impl From<VideoSummary> for http::VideoSummaryDto {
    fn from(summary: VideoSummary) -> Self {
        Self {
            id: summary.id.into_string(),
            title: summary.title,
            thumbnail_url: summary.thumbnail_url,
            channel_title: summary.channel_title,
            published_at: summary.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    fn parse(json: &str) -> Result<PlaybackCommand, ValidationError> {
        let dto: ws::InboundMessage = serde_json::from_str(json).unwrap();
        dto.try_into()
    }

    #[test]
    fn test_play_with_all_fields() {
        // テスト項目: play コマンドの JSON がドメインのコマンドに変換される
        // when (操作):
        let command = parse(r#"{"type":"play","videoId":"abc","timestamp":0}"#).unwrap();

        // then (期待する結果):
        assert_eq!(
            command,
            PlaybackCommand::Play {
                video_id: Some(VideoId::new("abc".to_string()).unwrap()),
                timestamp: Some(PlaybackPosition::ZERO),
            }
        );
    }

    #[test]
    fn test_absent_and_null_fields_are_none() {
        // テスト項目: 省略されたフィールドと null は「未指定」として扱われる
        let expected = PlaybackCommand::Pause { timestamp: None };
        assert_eq!(parse(r#"{"type":"pause"}"#).unwrap(), expected);
        assert_eq!(parse(r#"{"type":"pause","timestamp":null}"#).unwrap(), expected);
    }

    #[test]
    fn test_every_command_type_is_recognized() {
        // テスト項目: すべてのコマンド種別が認識される
        let cases = [
            (r#"{"type":"stop"}"#, "stop"),
            (r#"{"type":"seek","timestamp":12.5}"#, "seek"),
            (r#"{"type":"volume","volume":0}"#, "volume"),
            (r#"{"type":"mute","muted":false}"#, "mute"),
            (r#"{"type":"updateTimestamp","timestamp":3}"#, "updateTimestamp"),
        ];
        for (json, name) in cases {
            assert_eq!(parse(json).unwrap().name(), name, "json = {}", json);
        }
    }

    #[test]
    fn test_missing_required_fields_are_validation_errors() {
        // テスト項目: 必須フィールドが欠けたコマンドはバリデーションエラーになる
        // given (前提条件):
        let cases = [
            (r#"{"type":"seek"}"#, "seek", "timestamp"),
            (r#"{"type":"volume"}"#, "volume", "volume"),
            (r#"{"type":"mute"}"#, "mute", "muted"),
            (r#"{"type":"updateTimestamp"}"#, "updateTimestamp", "timestamp"),
        ];

        for (json, command, field) in cases {
            // when (操作):
            let result = parse(json);

            // then (期待する結果):
            assert_eq!(
                result,
                Err(ValidationError::MissingField { command, field }),
                "json = {}",
                json
            );
        }
    }

    #[test]
    fn test_out_of_range_values_are_validation_errors() {
        // テスト項目: 範囲外の値はバリデーションエラーになる
        assert_eq!(
            parse(r#"{"type":"volume","volume":150}"#),
            Err(ValidationError::VolumeOutOfRange(150))
        );
        assert_eq!(
            parse(r#"{"type":"seek","timestamp":-1}"#),
            Err(ValidationError::InvalidPosition(-1.0))
        );
        assert!(matches!(
            parse(r#"{"type":"play","videoId":"bad id"}"#),
            Err(ValidationError::InvalidVideoId(_))
        ));
    }

    #[test]
    fn test_unknown_type_fails_to_parse() {
        // テスト項目: 未知の type は JSON パースの段階で失敗する
        let result = serde_json::from_str::<ws::InboundMessage>(r#"{"type":"rewind"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_to_dto_omits_absent_fields() {
        // テスト項目: クライアントが送る JSON では未指定フィールドが省略される
        // given (前提条件):
        let command = PlaybackCommand::Play {
            video_id: None,
            timestamp: None,
        };

        // when (操作):
        let json = serde_json::to_string(&ws::InboundMessage::from(&command)).unwrap();

        // then (期待する結果):
        assert_eq!(json, r#"{"type":"play"}"#);
    }

    #[test]
    fn test_state_update_wire_format() {
        // テスト項目: stateUpdate が仕様どおりの JSON 形式で出力される
        // given (前提条件):
        let event = OutboundEvent::StateUpdate(BroadcastEvent {
            origin_id: ConnectionId::new("alice".to_string()).unwrap(),
            state: ParticipantState::default(),
        });

        // when (操作):
        let value = serde_json::to_value(ws::OutboundMessage::from(&event)).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({
                "type": "stateUpdate",
                "originId": "alice",
                "state": {
                    "videoId": null,
                    "transportState": "stopped",
                    "timestamp": 0.0,
                    "volume": 100,
                    "muted": false
                }
            })
        );
    }

    #[test]
    fn test_connected_message_is_decoded_into_event() {
        // テスト項目: connected メッセージがドメインのイベントに変換される
        let dto: ws::OutboundMessage =
            serde_json::from_str(r#"{"type":"connected","connectionId":"c-1"}"#).unwrap();

        let event = OutboundEvent::try_from(dto).unwrap();

        assert_eq!(
            event,
            OutboundEvent::Connected {
                connection_id: ConnectionId::new("c-1".to_string()).unwrap()
            }
        );
    }

    #[test]
    fn test_participant_to_entry_dto() {
        // テスト項目: 参加者が一覧 API の DTO に変換される
        let participant = Participant::new(
            ConnectionId::new("bob".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        );

        let dto: http::ParticipantEntryDto = participant.into();

        assert_eq!(dto.id, "bob");
        assert_eq!(dto.connected_at, "2023-01-01T00:00:00.000Z");
        assert_eq!(dto.state.transport_state, ws::TransportStateDto::Stopped);
    }
}
