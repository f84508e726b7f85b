//! Wire protocol messages.
//!
//! Every frame on the wire is a single self-contained JSON object tagged by
//! a `type` field. Both directions are closed sum types: the server
//! constructs every [`ServerMessage`] itself, and inbound frames decode into
//! [`ClientMessage`], with unrecognized `type` values collapsing into
//! [`ClientMessage::Unknown`] (silently ignored by the router).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel reported for physics/material blocks of objects that have none.
pub const NOT_APPLICABLE: &str = "Not applicable";

/// Requests a client can send to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Enumerate all live objects.
    GetObjects,
    /// Select an object and fetch its full property snapshot.
    GetObjectProperties { name: String },
    /// Mutate a single field of an object.
    ///
    /// `axis` applies to the `position`/`rotation`/`scale` transform
    /// properties and defaults to `x` when omitted.
    UpdateObjectProperty {
        object: String,
        property: String,
        value: Value,
        #[serde(default)]
        axis: Option<String>,
    },
    /// Flip an object's visibility flag.
    ToggleVisibility { object: String },
    /// Fetch frame rate, time scale and the mouse-cursor flag.
    GetGameInfo,
    /// Apply a new simulation time scale.
    SetGameSpeed { speed: Value },
    /// Not supported by any current engine binding; always answered with an
    /// `error` frame.
    TogglePhysicsDebug,
    /// Flip the process-wide mouse-cursor visibility flag.
    ToggleMouse,
    /// Restart the simulation.
    RestartGame,
    /// End the simulation.
    EndGame,
    /// Any unrecognized `type` value. Ignored, no response.
    #[serde(other)]
    Unknown,
}

/// Frames the server sends to clients, both as responses and as periodic
/// broadcast pushes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Objects { data: Vec<ObjectRef> },
    ObjectProperties { data: ObjectSnapshot },
    UpdateSuccess,
    VisibilityUpdated { object: String, visible: bool },
    /// Echoes the raw requested value back, not the applied one.
    GameSpeedUpdated { speed: Value },
    MouseVisibilityUpdated { visible: bool },
    GameRestarted,
    GameEnded,
    GameInfo { data: GameInfo },
    Error { message: String },
}

/// One entry of the object list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub name: String,
}

/// Coarse engine state reported by `get_game_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub fps: f64,
    pub game_speed: f64,
    pub mouse_visible: bool,
}

/// A three-component vector on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3Dto {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Transform block of an object snapshot. Rotation is in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicState {
    pub position: Vec3Dto,
    pub rotation: Vec3Dto,
    pub scale: Vec3Dto,
}

/// Physics block of an object snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhysicsState {
    Rigid {
        mass: f64,
        #[serde(rename = "linearVelocity")]
        linear_velocity: Vec3Dto,
        #[serde(rename = "angularVelocity")]
        angular_velocity: Vec3Dto,
    },
    NotApplicable {
        status: String,
    },
}

impl PhysicsState {
    /// The block reported for objects without a physics body.
    pub fn not_applicable() -> Self {
        PhysicsState::NotApplicable {
            status: NOT_APPLICABLE.to_string(),
        }
    }
}

/// A transient, read-only structured view of one object, rebuilt fresh on
/// every request and every broadcast tick.
///
/// `game` maps custom-property names to normalized scalars or `{x,y,z}`
/// vectors; a `BTreeMap` keeps serialization deterministic so every client
/// of a broadcast tick receives an identical payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    pub basic: BasicState,
    pub physics: PhysicsState,
    pub game: BTreeMap<String, Value>,
    pub materials: Vec<String>,
}
