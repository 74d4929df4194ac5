//! インメモリ Participant Repository
//!
//! Mutex で保護した `WatchSession` エンティティの上に、ドメイン層の
//! `ParticipantRepository` trait を実装します（依存性の逆転）。
//! 各呼び出しは読み取りから書き込みまでロックを保持するため、`update` は呼び出し単位で原子的です。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Participant, ParticipantRepository, ParticipantState, RepositoryError,
    StateMutator, Timestamp, WatchSession, WatchSessionSummary,
};

/// インメモリ Participant Repository 実装
pub struct InMemoryParticipantRepository {
    session: Arc<Mutex<WatchSession>>,
}

impl InMemoryParticipantRepository {
    /// 新しい InMemoryParticipantRepository を作成
    pub fn new(session: Arc<Mutex<WatchSession>>) -> Self {
        Self { session }
    }
}

impl Default for InMemoryParticipantRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(WatchSession::new())))
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn register(
        &self,
        id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<ParticipantState, RepositoryError> {
        let mut session = self.session.lock().await;
        session.register(id, connected_at)
    }

    async fn get(&self, id: &ConnectionId) -> Result<ParticipantState, RepositoryError> {
        let session = self.session.lock().await;
        session
            .get(id)
            .map(|p| p.state.clone())
            .ok_or_else(|| RepositoryError::ParticipantNotFound(id.as_str().to_string()))
    }

    async fn update(
        &self,
        id: &ConnectionId,
        mutator: StateMutator,
    ) -> Result<ParticipantState, RepositoryError> {
        let mut session = self.session.lock().await;
        session.update(id, mutator)
    }

    async fn remove(&self, id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut session = self.session.lock().await;
        if !session.remove(id) {
            tracing::debug!("Participant '{}' was already removed", id);
        }
        Ok(())
    }

    async fn list_all(&self) -> Vec<Participant> {
        let session = self.session.lock().await;
        session.participants().to_vec()
    }

    async fn connection_ids(&self) -> Vec<ConnectionId> {
        let session = self.session.lock().await;
        session.connection_ids()
    }

    async fn count(&self) -> usize {
        let session = self.session.lock().await;
        session.len()
    }

    async fn summary(&self) -> WatchSessionSummary {
        let session = self.session.lock().await;
        session.summary()
    }
}
