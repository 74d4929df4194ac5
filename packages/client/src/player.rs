//! Local player model.
//!
//! Stands in for the embedded video player: it knows which video is loaded,
//! its transport state, and derives the current position from the instant
//! playback last (re)started. Every time-dependent method takes `now` so the
//! caller decides the clock.

use std::time::Instant;

use cowatch_server::domain::{
    ParticipantState, PlaybackPosition, TransportState, VideoId, Volume,
};

use crate::error::ClientError;

/// A video cued in the local player.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedVideo {
    pub id: VideoId,
    /// Known once the metadata lookup succeeded.
    pub title: Option<String>,
    /// Length in seconds, when known.
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct LocalPlayer {
    video: Option<LoadedVideo>,
    transport_state: TransportState,
    /// Position at `playing_since`, or the frozen position otherwise.
    anchor: f64,
    playing_since: Option<Instant>,
    volume: Volume,
    muted: bool,
}

impl LocalPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cue `video` at `start_at` and start playing it.
    pub fn load(&mut self, video: LoadedVideo, start_at: PlaybackPosition, now: Instant) {
        self.video = Some(video);
        self.anchor = start_at.seconds();
        self.transport_state = TransportState::Playing;
        self.playing_since = Some(now);
    }

    /// Resume playback. Returns the position playback resumes from.
    pub fn play(&mut self, now: Instant) -> Result<PlaybackPosition, ClientError> {
        if self.video.is_none() {
            return Err(ClientError::NoVideoSelected);
        }
        if self.transport_state != TransportState::Playing {
            self.transport_state = TransportState::Playing;
            self.playing_since = Some(now);
        }
        Ok(self.position_at(now))
    }

    /// Freeze playback. Returns the position it was frozen at.
    pub fn pause(&mut self, now: Instant) -> Result<PlaybackPosition, ClientError> {
        if self.video.is_none() {
            return Err(ClientError::NoVideoSelected);
        }
        self.freeze(now);
        self.transport_state = TransportState::Paused;
        Ok(PlaybackPosition::new(self.anchor).unwrap_or(PlaybackPosition::ZERO))
    }

    /// Stop playback and rewind to the start. The video stays cued.
    pub fn stop(&mut self) {
        self.transport_state = TransportState::Stopped;
        self.anchor = 0.0;
        self.playing_since = None;
    }

    pub fn seek(&mut self, position: PlaybackPosition, now: Instant) -> Result<(), ClientError> {
        if self.video.is_none() {
            return Err(ClientError::NoVideoSelected);
        }
        self.anchor = self.clamp_to_duration(position.seconds());
        if self.playing_since.is_some() {
            self.playing_since = Some(now);
        }
        Ok(())
    }

    pub fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn position_at(&self, now: Instant) -> PlaybackPosition {
        let seconds = match self.playing_since {
            Some(since) => self.anchor + now.saturating_duration_since(since).as_secs_f64(),
            None => self.anchor,
        };
        PlaybackPosition::new(self.clamp_to_duration(seconds)).unwrap_or(PlaybackPosition::ZERO)
    }

    /// The player reached the end of a video of known length.
    pub fn has_ended(&self, now: Instant) -> bool {
        match (self.transport_state, self.duration()) {
            (TransportState::Playing, Some(duration)) => {
                self.position_at(now).seconds() >= duration
            }
            _ => false,
        }
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    pub fn video(&self) -> Option<&LoadedVideo> {
        self.video.as_ref()
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video.as_ref().map(|v| &v.id)
    }

    /// Length of the loaded video. A zero length (live streams report
    /// `P0D`) counts as unknown.
    pub fn duration(&self) -> Option<f64> {
        self.video
            .as_ref()
            .and_then(|v| v.duration)
            .filter(|duration| *duration > 0.0)
    }

    pub fn transport_state(&self) -> TransportState {
        self.transport_state
    }

    pub fn is_playing(&self) -> bool {
        self.transport_state == TransportState::Playing
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// The local player as a participant state, for display.
    pub fn snapshot(&self, now: Instant) -> ParticipantState {
        ParticipantState {
            video_id: self.video_id().cloned(),
            transport_state: self.transport_state,
            timestamp: self.position_at(now),
            volume: self.volume,
            muted: self.muted,
        }
    }

    fn freeze(&mut self, now: Instant) {
        self.anchor = self.position_at(now).seconds();
        self.playing_since = None;
    }

    fn clamp_to_duration(&self, seconds: f64) -> f64 {
        match self.duration() {
            Some(duration) => seconds.min(duration),
            None => seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn video(id: &str, duration: Option<f64>) -> LoadedVideo {
        LoadedVideo {
            id: VideoId::new(id.to_string()).unwrap(),
            title: None,
            duration,
        }
    }

    fn at(seconds: f64) -> PlaybackPosition {
        PlaybackPosition::new(seconds).unwrap()
    }

    #[test]
    fn test_new_player_is_idle() {
        let player = LocalPlayer::new();

        assert!(!player.has_video());
        assert_eq!(player.transport_state(), TransportState::Stopped);
        assert_eq!(player.volume().value(), 100);
        assert!(!player.is_muted());
    }

    #[test]
    fn test_load_starts_playing_from_start_position() {
        // テスト項目: 読み込んだ動画は指定位置から再生され、時間とともに位置が進む
        // given (前提条件):
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();

        // when (操作):
        player.load(video("abc", None), at(10.0), t0);

        // then (期待する結果):
        assert!(player.is_playing());
        assert_eq!(player.position_at(t0), at(10.0));
        assert_eq!(player.position_at(t0 + Duration::from_secs(5)), at(15.0));
    }

    #[test]
    fn test_play_without_video_is_rejected() {
        // テスト項目: 動画未選択での play / pause / seek はエラーになる
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();

        assert_eq!(player.play(t0), Err(ClientError::NoVideoSelected));
        assert_eq!(player.pause(t0), Err(ClientError::NoVideoSelected));
        assert_eq!(player.seek(at(3.0), t0), Err(ClientError::NoVideoSelected));
        assert_eq!(player.transport_state(), TransportState::Stopped);
    }

    #[test]
    fn test_pause_freezes_position_and_play_resumes() {
        // テスト項目: pause で位置が固定され、play で同じ位置から再開する
        // given (前提条件):
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();
        player.load(video("abc", None), at(0.0), t0);

        // when (操作):
        let paused_at = player.pause(t0 + Duration::from_secs(4)).unwrap();
        let later = t0 + Duration::from_secs(60);

        // then (期待する結果):
        assert_eq!(paused_at, at(4.0));
        assert_eq!(player.position_at(later), at(4.0));
        assert_eq!(player.play(later).unwrap(), at(4.0));
        assert_eq!(player.position_at(later + Duration::from_secs(2)), at(6.0));
    }

    #[test]
    fn test_stop_rewinds_but_keeps_video() {
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();
        player.load(video("abc", None), at(30.0), t0);

        player.stop();

        assert_eq!(player.transport_state(), TransportState::Stopped);
        assert_eq!(player.position_at(t0 + Duration::from_secs(10)), at(0.0));
        assert_eq!(player.video_id().unwrap().as_str(), "abc");
    }

    #[test]
    fn test_seek_while_playing_continues_from_new_position() {
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();
        player.load(video("abc", None), at(0.0), t0);

        player.seek(at(90.0), t0 + Duration::from_secs(3)).unwrap();

        assert_eq!(player.position_at(t0 + Duration::from_secs(5)), at(92.0));
    }

    #[test]
    fn test_has_ended_at_known_duration() {
        // テスト項目: 長さが分かっている動画は終端に達すると ended と判定され、位置は長さで止まる
        // given (前提条件):
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();
        player.load(video("abc", Some(10.0)), at(8.0), t0);

        // when (操作):
        let before = player.has_ended(t0 + Duration::from_secs(1));
        let after = player.has_ended(t0 + Duration::from_secs(3));

        // then (期待する結果):
        assert!(!before);
        assert!(after);
        assert_eq!(player.position_at(t0 + Duration::from_secs(30)), at(10.0));
    }

    #[test]
    fn test_unknown_duration_never_ends() {
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();
        player.load(video("abc", None), at(0.0), t0);

        assert!(!player.has_ended(t0 + Duration::from_secs(100_000)));
    }

    #[test]
    fn test_zero_duration_is_treated_as_unknown() {
        // テスト項目: 長さ 0 の動画 (ライブ配信) は終端判定されず、位置も 0 に固定されない
        // given (前提条件):
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();

        // when (操作):
        player.load(video("live", Some(0.0)), at(0.0), t0);

        // then (期待する結果):
        let later = t0 + Duration::from_secs(5);
        assert_eq!(player.duration(), None);
        assert!(!player.has_ended(later));
        assert_eq!(player.position_at(later), at(5.0));
    }

    #[test]
    fn test_snapshot_reflects_player() {
        let t0 = Instant::now();
        let mut player = LocalPlayer::new();
        player.load(video("abc", Some(253.0)), at(0.0), t0);
        player.set_volume(Volume::new(20).unwrap());
        player.set_muted(true);

        let snapshot = player.snapshot(t0);

        assert_eq!(player.duration(), Some(253.0));
        assert_eq!(snapshot.video_id.unwrap().as_str(), "abc");
        assert_eq!(snapshot.transport_state, TransportState::Playing);
        assert_eq!(snapshot.volume.value(), 20);
        assert!(snapshot.muted);
    }
}
