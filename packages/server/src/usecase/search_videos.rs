//! UseCase: 動画検索

use std::sync::Arc;

use crate::domain::{SearchQuery, VideoCatalog, VideoSummary};

use super::error::SearchVideosError;

/// 件数指定がない場合の検索件数
pub const DEFAULT_MAX_RESULTS: u8 = 10;

/// 上流の検索 API が受け付ける件数の上限
pub const MAX_RESULTS_LIMIT: u8 = 50;

pub struct SearchVideosUseCase {
    catalog: Arc<dyn VideoCatalog>,
}

impl SearchVideosUseCase {
    pub fn new(catalog: Arc<dyn VideoCatalog>) -> Self {
        Self { catalog }
    }

    /// カタログを検索する（0 件も成功として扱う）
    ///
    /// `max_results` の既定値は [`DEFAULT_MAX_RESULTS`] で、
    /// `1..=MAX_RESULTS_LIMIT` に丸められます。
    pub async fn execute(
        &self,
        query: String,
        max_results: Option<u32>,
    ) -> Result<Vec<VideoSummary>, SearchVideosError> {
        let query = SearchQuery::new(query).map_err(|_| SearchVideosError::EmptyQuery)?;
        let max_results = clamp_max_results(max_results);

        let hits = self
            .catalog
            .search_videos(&query, max_results)
            .await
            .map_err(|e| {
                tracing::warn!("Search for '{}' failed: {}", query.as_str(), e);
                SearchVideosError::from(e)
            })?;
        tracing::debug!("Search for '{}' returned {} hit(s)", query.as_str(), hits.len());
        Ok(hits)
    }
}

fn clamp_max_results(requested: Option<u32>) -> u8 {
    match requested {
        None => DEFAULT_MAX_RESULTS,
        Some(n) => n.clamp(1, u32::from(MAX_RESULTS_LIMIT)) as u8,
    }
}
