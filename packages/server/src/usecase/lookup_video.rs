//! UseCase: 動画メタデータの取得

use std::sync::Arc;

use crate::domain::{VideoCatalog, VideoDetails, VideoId};

use super::error::LookupVideoError;

pub struct LookupVideoUseCase {
    catalog: Arc<dyn VideoCatalog>,
}

impl LookupVideoUseCase {
    pub fn new(catalog: Arc<dyn VideoCatalog>) -> Self {
        Self { catalog }
    }

    /// 動画のメタデータを取得する（読み取り専用）
    pub async fn execute(&self, video_id: String) -> Result<VideoDetails, LookupVideoError> {
        let video_id = VideoId::new(video_id.clone())
            .map_err(|_| LookupVideoError::InvalidVideoId(video_id))?;

        self.catalog.lookup_video(&video_id).await.map_err(|e| {
            tracing::warn!("Lookup of video '{}' failed: {}", video_id, e);
            LookupVideoError::from(e)
        })
    }
}
