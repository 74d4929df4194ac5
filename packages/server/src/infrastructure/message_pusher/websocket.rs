//! WebSocket を使った MessagePusher 実装
//!
//! ソケットの受け付けと `UnboundedSender` の生成は UI 層が行い、
//! この実装は sender の保持とイベントのエンコードのみを担当します。
//!
//! - UI 層: 接続の受け付け、ソケットの送受信ハーフの所有
//! - Infrastructure 層: sender の保持、メッセージのエンコードと送信

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::websocket::OutboundMessage,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## フィールド
///
/// - `clients`: 接続 ID と、その接続の `pusher_loop` が読み出す sender のマップ
pub struct WebSocketMessagePusher {
    clients: Arc<Mutex<HashMap<String, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<String, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&OutboundMessage::from(event))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", client_id);
        clients.insert(client_id.into_string(), sender);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id.as_str());
        tracing::debug!("Client '{}' unregistered from MessagePusher", client_id);
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(client_id.as_str())
            .ok_or_else(|| MessagePushError::ClientNotFound(client_id.as_str().to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", client_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let mut delivered = 0;
        for target in targets {
            match clients.get(target.as_str()) {
                // a closed receiver means the connection is tearing down
                Some(sender) => match sender.send(content.clone()) {
                    Ok(()) => {
                        delivered += 1;
                        tracing::debug!("Broadcasted message to client '{}'", target);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to push message to client '{}': {}", target, e);
                    }
                },
                None => {
                    tracing::warn!("Client '{}' not found during broadcast, skipping", target);
                }
            }
        }

        Ok(delivered)
    }
}
