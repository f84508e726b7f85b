//! Live scene introspection/control server.
//!
//! Scenescope exposes a running simulation's mutable object graph (a "scene")
//! over WebSocket so remote debugger clients can enumerate objects, inspect
//! per-object state (transform, physics, custom properties, materials),
//! mutate individual fields, and receive periodic push updates.
//!
//! The scene itself is an external collaborator behind the
//! [`scene::SceneProvider`] trait; [`scene::memory::InMemoryScene`] is a full
//! in-memory implementation used by the demo binary and the test suite.

pub mod error;
pub mod messages;
pub mod numeric;
pub mod scene;
pub mod server;
