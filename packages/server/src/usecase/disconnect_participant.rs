//! UseCase: 参加者の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, ParticipantRepository};

/// 参加者切断のユースケース
///
/// 参加者の状態と送信チャネルを削除します。残りの参加者には通知せず、
/// 次回の一覧取得で変化が見えます。
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者を切断する（冪等）
    ///
    /// 戻り値は接続中の残り参加者数です。
    pub async fn execute(&self, connection_id: &ConnectionId) -> usize {
        // 1. Repository から削除（以降のブロードキャスト対象から外れる）
        if let Err(e) = self.repository.remove(connection_id).await {
            tracing::warn!("Failed to remove participant '{}': {}", connection_id, e);
        }

        // 2. MessagePusher から登録解除
        self.message_pusher.unregister_client(connection_id).await;

        let remaining = self.repository.count().await;
        tracing::info!(
            "Participant '{}' disconnected ({} remaining)",
            connection_id,
            remaining
        );
        remaining
    }
}
