//! Scene introspection server running against the in-memory demo scene.
//!
//! In a real deployment the server is embedded in the simulation host and
//! handed its engine's `SceneProvider`; this binary wires up the demo scene
//! so the protocol can be exercised standalone.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin scenescope-server
//! cargo run --bin scenescope-server -- --host 0.0.0.0 --port 9000
//! ```

use std::sync::Arc;

use clap::Parser;
use scenescope_server::scene::memory::InMemoryScene;
use scenescope_server::server::{DEFAULT_PORT, run_server};
use scenescope_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "scenescope-server")]
#[command(about = "Live scene introspection/control server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to start the free-port scan at
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let scene = Arc::new(InMemoryScene::demo());
    tracing::info!("Demo scene created");

    if let Err(e) = run_server(&args.host, args.port, scene).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
