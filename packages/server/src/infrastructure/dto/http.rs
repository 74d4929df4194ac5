//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::ParticipantStateDto;

/// Entry of `GET /api/participants`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEntryDto {
    pub id: String,
    pub state: ParticipantStateDto,
    /// RFC 3339
    pub connected_at: String,
}

/// Body of `GET /api/videos/{video_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetailsDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub duration: String,
    pub channel_title: String,
}

/// Entry of `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummaryDto {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub channel_title: String,
    pub published_at: String,
}

/// Query string of `GET /api/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
}
