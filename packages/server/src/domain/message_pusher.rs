//! MessagePusher trait definition.
//!
//! Abstraction over pushing outbound events to live connections. The UI layer
//! owns the transport (WebSocket); implementations only hold the per-connection
//! channel and encode events onto it.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, ParticipantState};

/// Channel used to deliver encoded messages to one connection.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Immutable snapshot published whenever a participant's state changes.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastEvent {
    pub origin_id: ConnectionId,
    pub state: ParticipantState,
}

/// Events the server sends to connections.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// Sent once to a new connection so it learns its own identity.
    Connected { connection_id: ConnectionId },
    StateUpdate(BroadcastEvent),
}

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register the delivery channel of a connection.
    async fn register_client(&self, client_id: ConnectionId, sender: PusherChannel);

    /// Forget the delivery channel of a connection.
    async fn unregister_client(&self, client_id: &ConnectionId);

    /// Push an event to a single connection.
    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError>;

    /// Push an event to every target.
    ///
    /// Unreachable targets are skipped; the number of successful deliveries
    /// is returned.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<usize, MessagePushError>;
}
