//! CLI probe client for the scene introspection server.
//!
//! Speaks the same JSON protocol the in-engine overlay uses, from an
//! interactive REPL. Useful for poking at a running scene without any UI.

pub mod commands;
pub mod error;
pub mod formatter;
pub mod session;
