//! Scene access layer.
//!
//! The simulation's object graph lives outside this crate and is mutated by
//! its own scheduler. The server only talks to it through the
//! [`SceneProvider`] trait, so the core stays testable against an in-memory
//! fake ([`memory::InMemoryScene`]) and a real engine binding can be swapped
//! in without touching the protocol code.
//!
//! The graph is not thread-safe by contract: an implementation must
//! serialize every call through a single mutual-exclusion boundary, and a
//! read-modify-write such as an axis update must be atomic within one
//! `update_property` call.

pub mod memory;
mod object;

use async_trait::async_trait;
use serde_json::Value;

pub use object::{Axis, PropertyValue, RigidBody, SceneObject, Vec3, parse_float};

use crate::error::SceneError;
use crate::messages::{ObjectRef, ObjectSnapshot};

/// Capability the server needs from the external object graph.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SceneProvider: Send + Sync {
    /// Enumerate all live objects, in scene order. May be empty.
    async fn list_objects(&self) -> Vec<ObjectRef>;

    /// Build a fresh wire-shaped snapshot of the named object.
    async fn snapshot(&self, name: &str) -> Result<ObjectSnapshot, SceneError>;

    /// Write a single property of the named object.
    ///
    /// For `position`/`rotation`/`scale` only the given axis is mutated
    /// (default `x`); rotation input is in degrees. Any other property name
    /// is coerced to the stored type of the existing property.
    async fn update_property<'a>(
        &self,
        name: &str,
        property: &str,
        value: &Value,
        axis: Option<&'a str>,
    ) -> Result<(), SceneError>;

    /// Flip the named object's visibility and return the new state.
    async fn toggle_visibility(&self, name: &str) -> Result<bool, SceneError>;

    /// Current average frame rate of the simulation.
    async fn average_frame_rate(&self) -> f64;

    /// Current simulation time scale.
    async fn time_scale(&self) -> f64;

    /// Apply a new simulation time scale.
    async fn set_time_scale(&self, scale: f64);

    /// Show or hide the engine mouse cursor.
    async fn show_mouse_cursor(&self, visible: bool);

    /// Restart the simulation from its initial state.
    async fn restart(&self);

    /// End the simulation.
    async fn end(&self);
}
