//! Utilities shared by the Scenescope server and client binaries.

pub mod logger;
