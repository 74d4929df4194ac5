//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, PlaybackCommand},
    infrastructure::dto::websocket::InboundMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's channel into the WebSocket.
///
/// Everything the server sends to this connection (the `connected`
/// message and every broadcast) goes through `rx`, so delivery order equals
/// enqueue order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Parse one text frame into a command.
///
/// Any failure means the frame is dropped; the caller keeps the connection.
fn parse_command(text: &str) -> Result<PlaybackCommand, String> {
    let message = serde_json::from_str::<InboundMessage>(text).map_err(|e| e.to_string())?;
    PlaybackCommand::try_from(message).map_err(|e| e.to_string())
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    let connection_id = match state.connect_participant_usecase.execute(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to accept connection: {}", e);
            return;
        }
    };

    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let origin_id: ConnectionId = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", origin_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let command = match parse_command(text.as_str()) {
                        Ok(command) => command,
                        Err(e) => {
                            tracing::warn!("Dropping invalid message from '{}': {}", origin_id, e);
                            continue;
                        }
                    };

                    if let Err(e) = recv_state
                        .apply_command_usecase
                        .execute(&origin_id, command)
                        .await
                    {
                        tracing::warn!("Dropping command from '{}': {}", origin_id, e);
                    }
                }
                Message::Ping(_) => {
                    // pong is sent by axum
                    tracing::debug!("Received ping from '{}'", origin_id);
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", origin_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await;
}
