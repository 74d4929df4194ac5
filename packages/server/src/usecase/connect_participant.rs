//! UseCase: 参加者の接続
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute()
//! - 接続 ID の払い出し、デフォルト状態での登録、connected メッセージの送信
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続がデフォルト状態で登録され、最初に connected を受け取る
//! - 正常系：複数接続がそれぞれ異なる ID を得る
//! - 異常系：connected の送信に失敗した場合、何も登録されない

use std::sync::Arc;

use cowatch_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionIdFactory, MessagePusher, OutboundEvent, ParticipantRepository,
    PusherChannel, Timestamp,
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 新しい接続を受け付ける
    ///
    /// 接続 ID を払い出し、登録より先に `connected` メッセージをチャネルに積むため、
    /// 接続が最初に受け取るメッセージは常に `connected` になります。
    /// 接続時のブロードキャストは行いません。
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConnectionId)` - 払い出した接続 ID
    /// * `Err(ConnectError)` - 何も登録されていない
    pub async fn execute(&self, sender: PusherChannel) -> Result<ConnectionId, ConnectError> {
        let connection_id = ConnectionIdFactory::generate();

        // 1. MessagePusher に送信チャンネルを登録
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        // 2. 自分の ID を通知
        let connected = OutboundEvent::Connected {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &connected).await {
            self.message_pusher.unregister_client(&connection_id).await;
            return Err(e.into());
        }

        // 3. Repository にデフォルト状態で登録
        let connected_at = Timestamp::new(self.clock.now_millis());
        if let Err(e) = self
            .repository
            .register(connection_id.clone(), connected_at)
            .await
        {
            self.message_pusher.unregister_client(&connection_id).await;
            return Err(e.into());
        }

        tracing::info!(
            "Participant '{}' connected ({} total)",
            connection_id,
            self.repository.count().await
        );
        Ok(connection_id)
    }
}
