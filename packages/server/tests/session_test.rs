//! Integration tests: the real router on an ephemeral port, driven over
//! WebSocket and HTTP.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use cowatch_server::{
    domain::{CatalogError, SearchQuery, VideoCatalog, VideoDetails, VideoId, VideoSummary},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryParticipantRepository,
    },
    ui::{AppState, build_router},
};
use cowatch_shared::time::SystemClock;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE: Duration = Duration::from_millis(200);

// ========================================
// Helpers
// ========================================

/// Catalog with canned answers.
///
/// - lookup: `known` → found, `broken` → upstream failure, anything else → not found
/// - search: `down` → upstream failure, otherwise `max_results` hits
struct FakeCatalog;

#[async_trait]
impl VideoCatalog for FakeCatalog {
    async fn lookup_video(&self, id: &VideoId) -> Result<VideoDetails, CatalogError> {
        match id.as_str() {
            "known" => Ok(VideoDetails {
                id: id.clone(),
                title: "Known video".to_string(),
                description: "A video that exists".to_string(),
                thumbnail_url: "https://i.ytimg.com/vi/known/hqdefault.jpg".to_string(),
                duration: "PT4M13S".to_string(),
                channel_title: "Test channel".to_string(),
            }),
            "broken" => Err(CatalogError::UpstreamUnavailable("boom".to_string())),
            other => Err(CatalogError::NotFound(other.to_string())),
        }
    }

    async fn search_videos(
        &self,
        query: &SearchQuery,
        max_results: u8,
    ) -> Result<Vec<VideoSummary>, CatalogError> {
        if query.as_str() == "down" {
            return Err(CatalogError::UpstreamUnavailable("boom".to_string()));
        }
        Ok((0..max_results)
            .map(|i| VideoSummary {
                id: VideoId::new(format!("hit{}", i)).unwrap(),
                title: format!("{} #{}", query.as_str(), i),
                thumbnail_url: format!("https://i.ytimg.com/vi/hit{}/mqdefault.jpg", i),
                channel_title: "Test channel".to_string(),
                published_at: "2024-01-01T00:00:00Z".to_string(),
            })
            .collect())
    }
}

struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let app_state = AppState::new(
            Arc::new(InMemoryParticipantRepository::default()),
            Arc::new(WebSocketMessagePusher::default()),
            Arc::new(FakeCatalog),
            Arc::new(SystemClock),
        );
        let app = build_router(Arc::new(app_state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, handle }
    }

    fn http(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Connect and consume the `connected` message. Returns the assigned id.
    async fn connect(&self) -> (Ws, String) {
        let (mut ws, _) = connect_async(format!("ws://{}/ws", self.addr)).await.unwrap();
        let first = next_json(&mut ws).await;
        assert_eq!(first["type"], "connected");
        let id = first["connectionId"].as_str().unwrap().to_string();
        (ws, id)
    }

    async fn participants(&self) -> Vec<Value> {
        reqwest::get(self.http("/api/participants"))
            .await
            .unwrap()
            .json::<Vec<Value>>()
            .await
            .unwrap()
    }

    async fn wait_for_participant_count(&self, expected: usize) -> Vec<Value> {
        for _ in 0..50 {
            let participants = self.participants().await;
            if participants.len() == expected {
                return participants;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("participant count never reached {}", expected);
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn next_json(ws: &mut Ws) -> Value {
    loop {
        let msg = timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream closed")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn send(ws: &mut Ws, value: Value) {
    ws.send(Message::text(value.to_string())).await.unwrap();
}

async fn assert_silent(ws: &mut Ws) {
    let result = timeout(SILENCE, ws.next()).await;
    assert!(result.is_err(), "expected no message, got {:?}", result);
}

fn entry<'a>(participants: &'a [Value], id: &str) -> &'a Value {
    participants
        .iter()
        .find(|p| p["id"] == id)
        .expect("participant not listed")
}

// ========================================
// WebSocket
// ========================================

#[tokio::test]
async fn test_connected_message_assigns_distinct_ids() {
    // テスト項目: 接続ごとに異なる ID が払い出され、デフォルト状態で一覧に並ぶ
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let (_a, id_a) = server.connect().await;
    let (_b, id_b) = server.connect().await;

    // then (期待する結果):
    assert_ne!(id_a, id_b);
    let participants = server.participants().await;
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0]["id"], id_a.as_str());
    assert_eq!(participants[1]["id"], id_b.as_str());
    assert_eq!(
        participants[0]["state"],
        json!({
            "videoId": null,
            "transportState": "stopped",
            "timestamp": 0.0,
            "volume": 100,
            "muted": false
        })
    );
}

#[tokio::test]
async fn test_connect_does_not_broadcast() {
    // テスト項目: 新規接続は既存の参加者に何も送らない
    let server = TestServer::start().await;
    let (mut a, _id_a) = server.connect().await;

    let (_b, _id_b) = server.connect().await;

    assert_silent(&mut a).await;
}

#[tokio::test]
async fn test_play_is_broadcast_to_everyone_including_origin() {
    // テスト項目: play は送信元を含む全員に同じ stateUpdate として届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut a, id_a) = server.connect().await;
    let (mut b, _id_b) = server.connect().await;

    // when (操作):
    send(&mut a, json!({"type": "play", "videoId": "abc", "timestamp": 0})).await;

    // then (期待する結果):
    let expected = json!({
        "type": "stateUpdate",
        "originId": id_a,
        "state": {
            "videoId": "abc",
            "transportState": "playing",
            "timestamp": 0.0,
            "volume": 100,
            "muted": false
        }
    });
    assert_eq!(next_json(&mut a).await, expected);
    assert_eq!(next_json(&mut b).await, expected);
}

#[tokio::test]
async fn test_states_are_independent_per_participant() {
    // テスト項目: A の操作は B の保存状態を変えない
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut a, id_a) = server.connect().await;
    let (mut b, id_b) = server.connect().await;

    // when (操作):
    send(&mut a, json!({"type": "play", "videoId": "abc", "timestamp": 0})).await;
    next_json(&mut b).await;
    send(&mut a, json!({"type": "pause", "timestamp": 42.5})).await;
    let paused = next_json(&mut b).await;

    // then (期待する結果):
    assert_eq!(paused["state"]["transportState"], "paused");
    assert_eq!(paused["state"]["timestamp"], 42.5);
    let participants = server.participants().await;
    assert_eq!(entry(&participants, &id_a)["state"]["transportState"], "paused");
    assert_eq!(entry(&participants, &id_b)["state"]["transportState"], "stopped");
    assert_eq!(entry(&participants, &id_b)["state"]["videoId"], Value::Null);
}

#[tokio::test]
async fn test_broadcasts_arrive_in_send_order() {
    // テスト項目: 同じ送信元からの更新は送信順に届く
    let server = TestServer::start().await;
    let (mut a, _id_a) = server.connect().await;
    let (mut b, _id_b) = server.connect().await;
    send(&mut a, json!({"type": "play", "videoId": "abc"})).await;
    next_json(&mut b).await;

    for seconds in [10, 20, 30, 40] {
        send(&mut a, json!({"type": "seek", "timestamp": seconds})).await;
    }

    for seconds in [10.0, 20.0, 30.0, 40.0] {
        assert_eq!(next_json(&mut b).await["state"]["timestamp"], seconds);
    }
}

#[tokio::test]
async fn test_update_timestamp_is_stored_but_not_broadcast() {
    // テスト項目: updateTimestamp は誰にも送られないが、一覧には反映される
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut a, id_a) = server.connect().await;
    let (mut b, _id_b) = server.connect().await;
    send(&mut a, json!({"type": "play", "videoId": "abc", "timestamp": 0})).await;
    next_json(&mut a).await;
    next_json(&mut b).await;

    // when (操作):
    send(&mut a, json!({"type": "updateTimestamp", "timestamp": 17.3})).await;

    // then (期待する結果):
    assert_silent(&mut a).await;
    assert_silent(&mut b).await;
    let participants = server.participants().await;
    assert_eq!(entry(&participants, &id_a)["state"]["timestamp"], 17.3);
    assert_eq!(entry(&participants, &id_a)["state"]["transportState"], "playing");
}

#[tokio::test]
async fn test_invalid_messages_are_dropped_and_connection_survives() {
    // テスト項目: 不正なメッセージは破棄され、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut a, id_a) = server.connect().await;
    let (mut b, _id_b) = server.connect().await;

    // when (操作):
    a.send(Message::text("not json")).await.unwrap();
    send(&mut a, json!({"type": "rewind"})).await;
    send(&mut a, json!({"type": "seek"})).await;
    send(&mut a, json!({"type": "volume", "volume": 150})).await;
    send(&mut a, json!({"type": "seek", "timestamp": -1})).await;
    send(&mut a, json!({"type": "play"})).await;

    // then (期待する結果):
    assert_silent(&mut b).await;
    send(&mut a, json!({"type": "volume", "volume": 30})).await;
    let update = next_json(&mut b).await;
    assert_eq!(update["originId"], id_a.as_str());
    assert_eq!(update["state"]["volume"], 30);
    assert_eq!(update["state"]["transportState"], "stopped");
}

#[tokio::test]
async fn test_disconnect_removes_participant_without_broadcast() {
    // テスト項目: 切断した参加者は一覧から消え、残りの参加者には何も送られない
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut a, _id_a) = server.connect().await;
    let (mut b, id_b) = server.connect().await;

    // when (操作):
    a.close(None).await.unwrap();

    // then (期待する結果):
    let participants = server.wait_for_participant_count(1).await;
    assert_eq!(participants[0]["id"], id_b.as_str());
    assert_silent(&mut b).await;
}

// ========================================
// HTTP
// ========================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await;

    let body: Value = reqwest::get(server.http("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_lookup_video_responses() {
    // テスト項目: 動画メタデータ取得は 200 / 404 / 502 / 400 を返し分ける
    let server = TestServer::start().await;

    let found = reqwest::get(server.http("/api/videos/known")).await.unwrap();
    assert_eq!(found.status(), reqwest::StatusCode::OK);
    let body: Value = found.json().await.unwrap();
    assert_eq!(body["id"], "known");
    assert_eq!(body["title"], "Known video");
    assert_eq!(body["duration"], "PT4M13S");
    assert_eq!(body["thumbnailUrl"], "https://i.ytimg.com/vi/known/hqdefault.jpg");

    let missing = reqwest::get(server.http("/api/videos/missing")).await.unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body, json!({"error": "Video not found"}));

    let broken = reqwest::get(server.http("/api/videos/broken")).await.unwrap();
    assert_eq!(broken.status(), reqwest::StatusCode::BAD_GATEWAY);

    let invalid = reqwest::get(server.http("/api/videos/bad%20id")).await.unwrap();
    assert_eq!(invalid.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_videos_responses() {
    // テスト項目: 検索は既定 10 件、maxResults は 50 で頭打ち、空クエリは 400
    let server = TestServer::start().await;

    let hits: Vec<Value> = reqwest::get(server.http("/api/search?q=cats"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 10);
    assert_eq!(hits[0]["id"], "hit0");
    assert_eq!(hits[0]["title"], "cats #0");

    let clamped: Vec<Value> = reqwest::get(server.http("/api/search?q=cats&maxResults=500"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(clamped.len(), 50);

    let blank = reqwest::get(server.http("/api/search?q=%20%20")).await.unwrap();
    assert_eq!(blank.status(), reqwest::StatusCode::BAD_REQUEST);

    let missing_query = reqwest::get(server.http("/api/search")).await.unwrap();
    assert_eq!(missing_query.status(), reqwest::StatusCode::BAD_REQUEST);

    let down = reqwest::get(server.http("/api/search?q=down")).await.unwrap();
    assert_eq!(down.status(), reqwest::StatusCode::BAD_GATEWAY);
}
