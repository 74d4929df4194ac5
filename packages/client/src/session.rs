//! One WebSocket connection to the server.

use std::time::{Duration, Instant};

use cowatch_server::{
    domain::{OutboundEvent, PlaybackCommand},
    infrastructure::dto::websocket::{InboundMessage, OutboundMessage},
};
use futures_util::{SinkExt, StreamExt};
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    controller::{Flow, SyncController},
    error::ClientError,
    input::UserCommand,
    ui::show,
};

const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Time given to the writer to flush queued commands when leaving.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Run one session until the user quits or the connection drops.
///
/// Returns `Ok(())` when the user left (quit, Ctrl+C, Ctrl+D) and a
/// `ConnectionError` when the connection was lost, so the caller may retry.
pub async fn run_client_session(
    url: &str,
    controller: &mut SyncController,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to {}", url);
    println!("\nConnected. Type 'help' for commands, 'quit' to leave.\n");

    let (mut write, mut read) = ws_stream.split();

    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<PlaybackCommand>();
    controller.attach(command_tx);

    let mut write_task = tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            let json = match serde_json::to_string(&InboundMessage::from(&command)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize {}: {}", command.name(), e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                return;
            }
        }
        write.close().await.ok();
    });

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<OutboundEvent>();
    let read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let event = serde_json::from_str::<OutboundMessage>(text.as_str())
                        .map_err(|e| e.to_string())
                        .and_then(|dto| OutboundEvent::try_from(dto).map_err(|e| e.to_string()));
                    match event {
                        Ok(event) => {
                            if event_tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => tracing::warn!("Ignoring unexpected message: {}", e),
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(OutboundEvent::Connected { connection_id }) => {
                    show(&controller.on_connected(connection_id, Instant::now()).await);
                }
                Some(OutboundEvent::StateUpdate(event)) => {
                    show(&controller.on_state_update(&event, Instant::now()).await);
                }
                None => {
                    break Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
            },
            line = input_rx.recv() => match line {
                Some(line) => match line.parse::<UserCommand>() {
                    Ok(command) => match controller.on_user_command(command, Instant::now()).await {
                        Flow::Continue(output) => show(&output),
                        Flow::Quit => break Ok(()),
                    },
                    Err(message) => show(&format!("{}\n", message)),
                },
                None => break Ok(()),
            },
            _ = ticker.tick() => {
                if let Some(output) = controller.on_tick(Instant::now()) {
                    show(&output);
                }
            }
        }
    };

    // dropping the sender lets the writer drain and close the socket
    controller.detach();
    if tokio::time::timeout(FLUSH_TIMEOUT, &mut write_task).await.is_err() {
        write_task.abort();
    }
    read_task.abort();

    result
}
