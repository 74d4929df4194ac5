//! UseCase: 参加者一覧の取得（HTTP プル）

use std::sync::Arc;

use crate::domain::{Participant, ParticipantRepository, WatchSessionSummary};

pub struct ListParticipantsUseCase {
    repository: Arc<dyn ParticipantRepository>,
}

impl ListParticipantsUseCase {
    pub fn new(repository: Arc<dyn ParticipantRepository>) -> Self {
        Self { repository }
    }

    /// 接続中の全参加者のスナップショットを登録順で返す
    pub async fn execute(&self) -> Vec<Participant> {
        self.repository.list_all().await
    }

    pub async fn summary(&self) -> WatchSessionSummary {
        self.repository.summary().await
    }
}
