//! cowatch session server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin cowatch-server
//! cargo run --bin cowatch-server -- --host 0.0.0.0 --port 3000
//! YOUTUBE_API_KEY=... cargo run --bin cowatch-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use cowatch_server::{
    infrastructure::{
        catalog::{YouTubeCatalog, youtube::DEFAULT_BASE_URL},
        message_pusher::WebSocketMessagePusher,
        repository::InMemoryParticipantRepository,
    },
    ui::{AppState, Server},
};
use cowatch_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "cowatch-server")]
#[command(about = "Synchronized video-playback session server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "3000")]
    port: u16,

    /// YouTube Data API key used for video lookup and search
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    youtube_api_key: Option<String>,

    /// Base URL of the YouTube Data API
    #[arg(long, env = "YOUTUBE_API_URL", default_value = DEFAULT_BASE_URL)]
    youtube_api_url: String,

    /// Timeout in seconds for each upstream catalog request
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "10")]
    upstream_timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. VideoCatalog
    // 4. AppState (UseCases)
    // 5. Server

    let repository = Arc::new(InMemoryParticipantRepository::default());
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    if args.youtube_api_key.is_none() {
        tracing::warn!("YOUTUBE_API_KEY is not set; video lookup and search will fail");
    }
    let catalog = match YouTubeCatalog::new(
        args.youtube_api_url,
        args.youtube_api_key,
        Duration::from_secs(args.upstream_timeout_secs),
    ) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            tracing::error!("Failed to create video catalog: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(repository, message_pusher, catalog, Arc::new(SystemClock));

    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
