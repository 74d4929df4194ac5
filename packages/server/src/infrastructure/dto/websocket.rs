//! WebSocket message DTOs.
//!
//! Every message is a JSON object tagged by `"type"`, with camelCase fields.

use serde::{Deserialize, Serialize};

/// Client → server command.
///
/// Fields are optional on the wire even where the command requires them, so
/// a missing field surfaces as a validation error instead of a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    #[serde(rename_all = "camelCase")]
    Play {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        video_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<f64>,
    },
    Pause {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<f64>,
    },
    Stop,
    Seek {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<f64>,
    },
    Volume {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        volume: Option<i64>,
    },
    Mute {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        muted: Option<bool>,
    },
    UpdateTimestamp {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<f64>,
    },
}

/// Server → client message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    #[serde(rename_all = "camelCase")]
    Connected { connection_id: String },
    #[serde(rename_all = "camelCase")]
    StateUpdate {
        origin_id: String,
        state: ParticipantStateDto,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportStateDto {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStateDto {
    pub video_id: Option<String>,
    pub transport_state: TransportStateDto,
    pub timestamp: f64,
    pub volume: u8,
    pub muted: bool,
}
