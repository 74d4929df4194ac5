//! Port to the external video metadata and search service.

use async_trait::async_trait;

use super::{CatalogError, SearchQuery, VideoId};

/// Metadata of a single video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    /// ISO 8601 duration as reported by the catalog (e.g. `PT4M13S`).
    pub duration: String,
    pub channel_title: String,
}

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSummary {
    pub id: VideoId,
    pub title: String,
    pub thumbnail_url: String,
    pub channel_title: String,
    pub published_at: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Look up a video by id.
    async fn lookup_video(&self, id: &VideoId) -> Result<VideoDetails, CatalogError>;

    /// Search videos; an empty result is not an error.
    async fn search_videos(
        &self,
        query: &SearchQuery,
        max_results: u8,
    ) -> Result<Vec<VideoSummary>, CatalogError>;
}
