//! Server execution logic: port search, routing and serving.

use std::sync::Arc;

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::scene::SceneProvider;

use super::broadcast::run_broadcast_loop;
use super::handler::{health_check, websocket_handler};
use super::signal::shutdown_signal;
use super::state::AppState;

/// First port tried when searching for a free one.
pub const DEFAULT_PORT: u16 = 8765;

/// Size of the upward port scan window.
pub const PORT_SEARCH_WINDOW: u16 = 100;

/// How often a lost bind race is retried before giving up.
const MAX_BIND_ATTEMPTS: u32 = 5;

/// Startup faults. Nothing past a successful bind is fatal to the process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("no free port in {0}..{1}")]
    NoFreePort(u16, u16),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Build the axum router for the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Probe the scan window for a port that can currently be bound.
async fn find_free_port(host: &str, start_port: u16) -> Option<u16> {
    let end = start_port.saturating_add(PORT_SEARCH_WINDOW);
    for port in start_port..end {
        if TcpListener::bind((host, port)).await.is_ok() {
            return Some(port);
        }
    }
    None
}

/// Run the introspection server against the given scene.
///
/// Scans for a free port starting at `start_port`; if the subsequent bind
/// races with another process, the scan resumes past the contested port, up
/// to a fixed number of attempts.
pub async fn run_server(
    host: &str,
    start_port: u16,
    scene: Arc<dyn SceneProvider>,
) -> Result<(), ServerError> {
    let state = Arc::new(AppState::new(scene));

    let mut scan_from = start_port;
    for attempt in 1..=MAX_BIND_ATTEMPTS {
        let Some(port) = find_free_port(host, scan_from).await else {
            tracing::error!(
                "No free ports in {}..{}. Unable to start the introspection server.",
                scan_from,
                scan_from.saturating_add(PORT_SEARCH_WINDOW)
            );
            return Err(ServerError::NoFreePort(
                scan_from,
                scan_from.saturating_add(PORT_SEARCH_WINDOW),
            ));
        };

        match TcpListener::bind((host, port)).await {
            Ok(listener) => return serve(listener, state).await,
            Err(e) if attempt < MAX_BIND_ATTEMPTS => {
                tracing::warn!("Port {} is in use ({}), trying another port...", port, e);
                scan_from = port.saturating_add(1);
            }
            Err(e) => {
                tracing::error!("Error starting the introspection server: {}", e);
                return Err(e.into());
            }
        }
    }

    Err(ServerError::NoFreePort(
        start_port,
        start_port.saturating_add(PORT_SEARCH_WINDOW),
    ))
}

/// Serve the introspection protocol on an already-bound listener.
///
/// Spawns the broadcast loop, then accepts connections until a shutdown
/// signal arrives.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    tokio::spawn(run_broadcast_loop(state.clone()));

    let app = build_router(state);

    let addr = listener.local_addr()?;
    tracing::info!("Scene introspection server listening on {}", addr);
    tracing::info!("Connect to: ws://{}/ws", addr);
    tracing::info!("Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
