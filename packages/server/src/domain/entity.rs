//! Entities of the watch session.

use serde::Serialize;

use super::{
    error::{RepositoryError, TransitionError},
    playback::ParticipantState,
    value_object::{ConnectionId, Timestamp},
};

/// One live connection and its playback state.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ConnectionId,
    pub state: ParticipantState,
    pub connected_at: Timestamp,
}

impl Participant {
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            state: ParticipantState::default(),
            connected_at,
        }
    }
}

/// Registry of every live participant, in registration order.
///
/// All connections share one session. The registry never broadcasts; that
/// is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct WatchSession {
    participants: Vec<Participant>,
}

/// Snapshot of the registry used by the debug endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WatchSessionSummary {
    pub participant_count: usize,
    pub playing: usize,
    pub paused: usize,
    pub stopped: usize,
}

impl WatchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new participant with default state.
    pub fn register(
        &mut self,
        id: ConnectionId,
        connected_at: Timestamp,
    ) -> Result<ParticipantState, RepositoryError> {
        if self.position_of(&id).is_some() {
            return Err(RepositoryError::AlreadyRegistered(id.into_string()));
        }
        let participant = Participant::new(id, connected_at);
        let state = participant.state.clone();
        self.participants.push(participant);
        Ok(state)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// Mutate one participant's state.
    ///
    /// The mutator runs against a copy that is committed only when it
    /// succeeds. Unknown ids never create an entry.
    pub fn update<F>(&mut self, id: &ConnectionId, mutator: F) -> Result<ParticipantState, RepositoryError>
    where
        F: FnOnce(&mut ParticipantState) -> Result<(), TransitionError>,
    {
        let index = self
            .position_of(id)
            .ok_or_else(|| RepositoryError::ParticipantNotFound(id.as_str().to_string()))?;

        let mut next = self.participants[index].state.clone();
        mutator(&mut next)?;
        self.participants[index].state = next.clone();
        Ok(next)
    }

    /// Remove a participant. Returns whether an entry was removed.
    pub fn remove(&mut self, id: &ConnectionId) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.participants.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn summary(&self) -> WatchSessionSummary {
        use super::playback::TransportState;

        let count = |wanted: TransportState| {
            self.participants
                .iter()
                .filter(|p| p.state.transport_state == wanted)
                .count()
        };
        WatchSessionSummary {
            participant_count: self.participants.len(),
            playing: count(TransportState::Playing),
            paused: count(TransportState::Paused),
            stopped: count(TransportState::Stopped),
        }
    }

    fn position_of(&self, id: &ConnectionId) -> Option<usize> {
        self.participants.iter().position(|p| &p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        PlaybackCommand, PlaybackPosition, TransportState, VideoId,
    };

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    fn play_abc(state: &mut ParticipantState) -> Result<(), TransitionError> {
        state.apply(&PlaybackCommand::Play {
            video_id: Some(VideoId::new("abc".to_string()).unwrap()),
            timestamp: Some(PlaybackPosition::ZERO),
        })
    }

    #[test]
    fn test_register_returns_default_state() {
        // テスト項目: 登録直後の参加者はデフォルト状態を持つ
        // given (前提条件):
        let mut session = WatchSession::new();

        // when (操作):
        let state = session.register(id("alice"), Timestamp::new(1000)).unwrap();

        // then (期待する結果):
        assert_eq!(state, ParticipantState::default());
        assert_eq!(session.len(), 1);
        assert_eq!(session.get(&id("alice")).unwrap().connected_at.value(), 1000);
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        // テスト項目: 同じ接続 ID の二重登録はエラーになる
        let mut session = WatchSession::new();
        session.register(id("alice"), Timestamp::new(1)).unwrap();

        let result = session.register(id("alice"), Timestamp::new(2));

        assert_eq!(
            result,
            Err(RepositoryError::AlreadyRegistered("alice".to_string()))
        );
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_participants_are_kept_in_registration_order() {
        // テスト項目: 参加者一覧は登録順に並ぶ
        // given (前提条件):
        let mut session = WatchSession::new();

        // when (操作):
        for name in ["charlie", "alice", "bob"] {
            session.register(id(name), Timestamp::new(0)).unwrap();
        }

        // then (期待する結果):
        let ids: Vec<&str> = session.participants().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["charlie", "alice", "bob"]);
    }

    #[test]
    fn test_update_unknown_id_is_not_found_and_creates_nothing() {
        // テスト項目: 未登録 ID への update は not-found を返し、エントリを作成しない
        // given (前提条件):
        let mut session = WatchSession::new();

        // when (操作):
        let result = session.update(&id("ghost"), play_abc);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::ParticipantNotFound("ghost".to_string()))
        );
        assert!(session.is_empty());
    }

    #[test]
    fn test_update_commits_successful_mutation() {
        // テスト項目: 成功した変更は保存され、更新後の状態が返される
        let mut session = WatchSession::new();
        session.register(id("alice"), Timestamp::new(0)).unwrap();

        let state = session.update(&id("alice"), play_abc).unwrap();

        assert_eq!(state.transport_state, TransportState::Playing);
        assert_eq!(session.get(&id("alice")).unwrap().state, state);
    }

    #[test]
    fn test_update_rejected_mutation_leaves_state_untouched() {
        // テスト項目: 拒否された変更は途中まで適用されず、元の状態が保たれる
        // given (前提条件):
        let mut session = WatchSession::new();
        session.register(id("alice"), Timestamp::new(0)).unwrap();

        // when (操作):
        let result = session.update(&id("alice"), |state| {
            state.muted = true;
            Err(TransitionError::NoVideoLoaded("play"))
        });

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::Rejected(TransitionError::NoVideoLoaded("play")))
        );
        assert!(!session.get(&id("alice")).unwrap().state.muted);
    }

    #[test]
    fn test_update_does_not_touch_other_participants() {
        // テスト項目: ある参加者の更新は他の参加者の状態に影響しない
        let mut session = WatchSession::new();
        session.register(id("alice"), Timestamp::new(0)).unwrap();
        session.register(id("bob"), Timestamp::new(0)).unwrap();

        session.update(&id("alice"), play_abc).unwrap();

        assert_eq!(
            session.get(&id("bob")).unwrap().state,
            ParticipantState::default()
        );
    }

    #[test]
    fn test_remove_participant() {
        // テスト項目: 削除した参加者は一覧から消え、二度目の削除は false を返す
        let mut session = WatchSession::new();
        session.register(id("alice"), Timestamp::new(0)).unwrap();
        session.register(id("bob"), Timestamp::new(0)).unwrap();

        assert!(session.remove(&id("alice")));
        assert!(!session.remove(&id("alice")));
        assert_eq!(session.connection_ids(), vec![id("bob")]);
    }

    #[test]
    fn test_summary_counts_transport_states() {
        // テスト項目: サマリーが再生状態ごとの人数を数える
        let mut session = WatchSession::new();
        session.register(id("alice"), Timestamp::new(0)).unwrap();
        session.register(id("bob"), Timestamp::new(0)).unwrap();
        session.update(&id("alice"), play_abc).unwrap();

        let summary = session.summary();

        assert_eq!(summary.participant_count, 2);
        assert_eq!(summary.playing, 1);
        assert_eq!(summary.paused, 0);
        assert_eq!(summary.stopped, 1);
    }
}
