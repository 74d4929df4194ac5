//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use crate::{
    api::HttpSessionApi,
    controller::SyncController,
    domain::{should_attempt_reconnect, should_exit_immediately, websocket_url},
    error::ClientError,
    session::run_client_session,
    ui::spawn_input_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Run the client against `server_url` (e.g. `http://127.0.0.1:3000`).
///
/// The local player survives reconnects; each new connection gets a fresh
/// identity from the server and re-pulls the participant list.
pub async fn run_client(server_url: String) -> Result<(), ClientError> {
    let ws_url = websocket_url(&server_url)?;
    let api = HttpSessionApi::new(server_url, Duration::from_secs(HTTP_TIMEOUT_SECS))?;
    let mut controller = SyncController::new(Arc::new(api));
    let mut input_rx = spawn_input_reader();
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            ws_url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&ws_url, &mut controller, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
