//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::WatchSessionSummary,
    infrastructure::dto::http::{
        ErrorResponseDto, ParticipantEntryDto, SearchParams, VideoDetailsDto, VideoSummaryDto,
    },
    ui::state::AppState,
    usecase::{LookupVideoError, SearchVideosError},
};

type ApiError = (StatusCode, Json<ErrorResponseDto>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponseDto {
            error: message.into(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint with per-state participant counts
pub async fn debug_session(State(state): State<Arc<AppState>>) -> Json<WatchSessionSummary> {
    Json(state.list_participants_usecase.summary().await)
}

/// Every connected participant and its playback state, in registration order
pub async fn list_participants(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ParticipantEntryDto>> {
    let participants = state.list_participants_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(participants.into_iter().map(ParticipantEntryDto::from).collect())
}

pub async fn lookup_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoDetailsDto>, ApiError> {
    match state.lookup_video_usecase.execute(video_id).await {
        Ok(details) => Ok(Json(details.into())),
        Err(LookupVideoError::InvalidVideoId(_)) => {
            Err(api_error(StatusCode::BAD_REQUEST, "Invalid video id"))
        }
        Err(LookupVideoError::NotFound(_)) => {
            Err(api_error(StatusCode::NOT_FOUND, "Video not found"))
        }
        Err(LookupVideoError::UpstreamUnavailable(_)) => Err(api_error(
            StatusCode::BAD_GATEWAY,
            "Failed to fetch video details",
        )),
    }
}

pub async fn search_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<VideoSummaryDto>>, ApiError> {
    match state
        .search_videos_usecase
        .execute(params.q, params.max_results)
        .await
    {
        Ok(hits) => Ok(Json(hits.into_iter().map(VideoSummaryDto::from).collect())),
        Err(SearchVideosError::EmptyQuery) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Search query is required",
        )),
        Err(SearchVideosError::UpstreamUnavailable(_)) => Err(api_error(
            StatusCode::BAD_GATEWAY,
            "Failed to search videos",
        )),
    }
}
