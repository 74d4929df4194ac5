//! UseCase: 再生コマンドの適用
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ApplyCommandUseCase::execute()
//! - 状態遷移の保存と、遷移ごとのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：play / pause / seek / volume / mute が全参加者にブロードキャストされる
//! - 正常系：updateTimestamp は保存されるがブロードキャストされない
//! - 異常系：未登録の送信元、動画なしの play は破棄され、何も送られない

use std::sync::Arc;

use crate::domain::{ConnectionId, ParticipantRepository, ParticipantState, PlaybackCommand};

use super::{broadcast_state::BroadcastStateUseCase, error::ApplyCommandError};

/// 再生コマンド適用のユースケース
///
/// 参加者から届いたコマンドを、その参加者自身の状態にのみ適用します。
pub struct ApplyCommandUseCase {
    repository: Arc<dyn ParticipantRepository>,
    broadcaster: Arc<BroadcastStateUseCase>,
}

impl ApplyCommandUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        broadcaster: Arc<BroadcastStateUseCase>,
    ) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    /// 送信元の状態に `command` を適用する
    ///
    /// `updateTimestamp` 以外の受理されたコマンドは、遷移後の状態をちょうど 1 回
    /// ブロードキャストします。拒否されたコマンドは何も変更せず、何も送信しません。
    pub async fn execute(
        &self,
        origin_id: &ConnectionId,
        command: PlaybackCommand,
    ) -> Result<ParticipantState, ApplyCommandError> {
        let broadcasts = command.broadcasts();
        let name = command.name();

        let state = self
            .repository
            .update(
                origin_id,
                Box::new(move |state: &mut ParticipantState| state.apply(&command)),
            )
            .await?;

        if !broadcasts {
            tracing::debug!(
                "Heartbeat from '{}' at {:.2}s",
                origin_id,
                state.timestamp.seconds()
            );
            return Ok(state);
        }

        tracing::info!(
            "'{}' from '{}': {} video={} timestamp={:.2}s",
            name,
            origin_id,
            state.transport_state.as_str(),
            state
                .video_id
                .as_ref()
                .map(|v| v.as_str())
                .unwrap_or("-"),
            state.timestamp.seconds()
        );

        match self.broadcaster.publish(origin_id, state.clone()).await {
            Ok(delivered) => {
                tracing::debug!("State of '{}' delivered to {} participant(s)", origin_id, delivered)
            }
            Err(e) => tracing::warn!("Failed to broadcast state of '{}': {}", origin_id, e),
        }

        Ok(state)
    }
}
