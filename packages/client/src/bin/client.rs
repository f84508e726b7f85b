//! Interactive probe client for the scene introspection server.
//!
//! Connects to a running server and offers a REPL over the introspection
//! protocol: list objects, watch a selection, update properties, toggle
//! visibility and drive game-level controls.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin scenescope-client
//! cargo run --bin scenescope-client -- --url ws://127.0.0.1:8765/ws
//! ```

use clap::Parser;

use scenescope_client::session::run_client_session;
use scenescope_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "scenescope-client")]
#[command(about = "Interactive probe client for the scene introspection server", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8765/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client_session(&args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
