//! UseCase: 状態のブロードキャスト
//!
//! 参加者の新しい状態を、送信元を含む全参加者に配信します。
//! 自分自身のエコーはクライアント側で無視されます。

use std::sync::Arc;

use crate::domain::{
    BroadcastEvent, ConnectionId, MessagePushError, MessagePusher, OutboundEvent,
    ParticipantRepository, ParticipantState,
};

pub struct BroadcastStateUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastStateUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// `{origin, state}` を全参加者に配信する
    ///
    /// 配信中に切断された接続はスキップし、残りの配信は続けます。
    /// 戻り値は配信できた件数です。
    pub async fn publish(
        &self,
        origin_id: &ConnectionId,
        state: ParticipantState,
    ) -> Result<usize, MessagePushError> {
        let targets = self.repository.connection_ids().await;
        let event = OutboundEvent::StateUpdate(BroadcastEvent {
            origin_id: origin_id.clone(),
            state,
        });
        self.message_pusher.broadcast(targets, &event).await
    }
}
