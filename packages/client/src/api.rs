//! HTTP pull client for the server's `/api` routes.

use std::time::Duration;

use async_trait::async_trait;
use cowatch_server::infrastructure::dto::http::{
    ParticipantEntryDto, VideoDetailsDto, VideoSummaryDto,
};
use reqwest::StatusCode;

use crate::error::ClientError;

/// Pull-side operations the session needs from the server.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Snapshot of every participant, in registration order.
    async fn list_participants(&self) -> Result<Vec<ParticipantEntryDto>, ClientError>;

    /// `Ok(None)` when the video does not exist.
    async fn lookup_video(&self, video_id: &str) -> Result<Option<VideoDetailsDto>, ClientError>;

    async fn search_videos(&self, query: &str) -> Result<Vec<VideoSummaryDto>, ClientError>;
}

/// `SessionApi` over reqwest.
pub struct HttpSessionApi {
    /// Base URL without trailing slash (e.g. "http://127.0.0.1:3000")
    base_url: String,
    client: reqwest::Client,
}

impl HttpSessionApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidServerUrl(base_url));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<reqwest::Response, ClientError> {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))
    }
}

async fn decode<T>(response: reqwest::Response) -> Result<T, ClientError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::RequestFailed(format!("server returned {}", status)));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::RequestFailed(format!("invalid response body: {}", e)))
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn list_participants(&self) -> Result<Vec<ParticipantEntryDto>, ClientError> {
        decode(self.get("/api/participants", &[]).await?).await
    }

    async fn lookup_video(&self, video_id: &str) -> Result<Option<VideoDetailsDto>, ClientError> {
        let response = self.get(&format!("/api/videos/{}", video_id), &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    async fn search_videos(&self, query: &str) -> Result<Vec<VideoSummaryDto>, ClientError> {
        decode(self.get("/api/search", &[("q", query)]).await?).await
    }
}
