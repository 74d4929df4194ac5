//! YouTube Data API v3 backed VideoCatalog.
//!
//! # Endpoints
//!
//! - `GET {base}/videos?part=snippet,contentDetails&id=...` for lookups
//! - `GET {base}/search?part=snippet&type=video&q=...&maxResults=...` for search
//!
//! Lookups use the `high` thumbnail and search hits the `medium` one, falling
//! back to whatever size the API returned.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{CatalogError, SearchQuery, VideoCatalog, VideoDetails, VideoId, VideoSummary};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Client for the YouTube Data API.
pub struct YouTubeCatalog {
    /// Base URL without trailing slash
    base_url: String,

    /// API key; requests fail fast without one
    api_key: Option<String>,

    client: reqwest::Client,
}

impl YouTubeCatalog {
    /// Create a catalog client.
    ///
    /// `timeout` bounds every upstream request, so a hung upstream surfaces
    /// as `UpstreamUnavailable` instead of stalling the HTTP handler.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CatalogError::UpstreamUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    fn api_key(&self) -> Result<&str, CatalogError> {
        self.api_key.as_deref().ok_or_else(|| {
            CatalogError::UpstreamUnavailable("YouTube API key is not configured".to_string())
        })
    }

    async fn get_json<T>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, CatalogError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key()?)])
            .send()
            .await
            .map_err(|e| CatalogError::UpstreamUnavailable(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UpstreamUnavailable(format!(
                "YouTube API returned {}",
                status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            CatalogError::UpstreamUnavailable(format!("Failed to decode response: {}", e))
        })
    }
}

#[async_trait]
impl VideoCatalog for YouTubeCatalog {
    async fn lookup_video(&self, id: &VideoId) -> Result<VideoDetails, CatalogError> {
        let response: ListResponse<VideoItem> = self
            .get_json(
                "videos",
                &[("part", "snippet,contentDetails"), ("id", id.as_str())],
            )
            .await?;

        video_details_from(response, id)
    }

    async fn search_videos(
        &self,
        query: &SearchQuery,
        max_results: u8,
    ) -> Result<Vec<VideoSummary>, CatalogError> {
        let max_results = max_results.to_string();
        let response: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("q", query.as_str()),
                    ("maxResults", &max_results),
                ],
            )
            .await?;

        Ok(video_summaries_from(response))
    }
}

// ========================================
// Upstream response bodies
// ========================================

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    snippet: Snippet,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

impl Thumbnails {
    fn pick(preferred: &[&Option<Thumbnail>]) -> String {
        preferred
            .iter()
            .find_map(|t| (*t).as_ref())
            .map(|t| t.url.clone())
            .unwrap_or_default()
    }

    fn high_first(&self) -> String {
        Self::pick(&[&self.high, &self.medium, &self.default])
    }

    fn medium_first(&self) -> String {
        Self::pick(&[&self.medium, &self.high, &self.default])
    }
}

fn video_details_from(
    response: ListResponse<VideoItem>,
    requested: &VideoId,
) -> Result<VideoDetails, CatalogError> {
    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| CatalogError::NotFound(requested.as_str().to_string()))?;

    let id = VideoId::new(item.id).unwrap_or_else(|_| requested.clone());
    Ok(VideoDetails {
        id,
        thumbnail_url: item.snippet.thumbnails.high_first(),
        title: item.snippet.title,
        description: item.snippet.description,
        duration: item
            .content_details
            .map(|details| details.duration)
            .unwrap_or_default(),
        channel_title: item.snippet.channel_title,
    })
}

fn video_summaries_from(response: ListResponse<SearchItem>) -> Vec<VideoSummary> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            // channel/playlist hits carry no videoId
            let id = item.id.video_id.and_then(|id| VideoId::new(id).ok())?;
            Some(VideoSummary {
                id,
                thumbnail_url: item.snippet.thumbnails.medium_first(),
                title: item.snippet.title,
                channel_title: item.snippet.channel_title,
                published_at: item.snippet.published_at,
            })
        })
        .collect()
}
