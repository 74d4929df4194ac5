//! Shared application state.

use std::sync::Arc;

use cowatch_shared::time::Clock;

use crate::{
    domain::{MessagePusher, ParticipantRepository, VideoCatalog},
    usecase::{
        ApplyCommandUseCase, BroadcastStateUseCase, ConnectParticipantUseCase,
        DisconnectParticipantUseCase, ListParticipantsUseCase, LookupVideoUseCase,
        SearchVideosUseCase,
    },
};

/// 全ハンドラで共有するユースケース
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// ApplyCommandUseCase（再生コマンド適用のユースケース）
    pub apply_command_usecase: Arc<ApplyCommandUseCase>,
    /// ListParticipantsUseCase（参加者一覧のユースケース）
    pub list_participants_usecase: Arc<ListParticipantsUseCase>,
    /// LookupVideoUseCase（動画メタデータ取得のユースケース）
    pub lookup_video_usecase: Arc<LookupVideoUseCase>,
    /// SearchVideosUseCase（動画検索のユースケース）
    pub search_videos_usecase: Arc<SearchVideosUseCase>,
}

impl AppState {
    /// 与えられたポートから全ユースケースを組み立てる
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        catalog: Arc<dyn VideoCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let broadcaster = Arc::new(BroadcastStateUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher,
            )),
            apply_command_usecase: Arc::new(ApplyCommandUseCase::new(
                repository.clone(),
                broadcaster,
            )),
            list_participants_usecase: Arc::new(ListParticipantsUseCase::new(repository)),
            lookup_video_usecase: Arc::new(LookupVideoUseCase::new(catalog.clone())),
            search_videos_usecase: Arc::new(SearchVideosUseCase::new(catalog)),
        }
    }
}
