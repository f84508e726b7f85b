//! WebSocket introspection server implementation.

mod broadcast;
mod handler;
mod runner;
mod signal;
mod state;

pub use broadcast::{BROADCAST_INTERVAL, run_broadcast_loop};
pub use runner::{DEFAULT_PORT, PORT_SEARCH_WINDOW, ServerError, build_router, run_server, serve};
pub use state::{AppState, Registry};
