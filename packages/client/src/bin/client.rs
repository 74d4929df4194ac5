//! Terminal client for a cowatch session.
//!
//! Connects to the server's WebSocket endpoint, keeps a local player in step
//! with the other participants and sends your transport controls.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin cowatch-client
//! cargo run --bin cowatch-client -- -s http://192.168.0.10:3000
//! ```

use clap::Parser;

use cowatch_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "cowatch-client")]
#[command(about = "Terminal client for a synchronized watch session", long_about = None)]
struct Args {
    /// Server base URL (the WebSocket URL is derived from it)
    #[arg(short = 's', long, default_value = "http://127.0.0.1:3000")]
    server: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = cowatch_client::run_client(args.server).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
