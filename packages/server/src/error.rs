//! Error types for scene access.

use thiserror::Error;

/// Errors raised by a [`SceneProvider`](crate::scene::SceneProvider).
///
/// Every variant is recoverable at the protocol layer: the router converts
/// it into an `error` wire message for the requesting client and keeps the
/// connection open.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The named object does not exist in the scene.
    #[error("Object '{0}' not found")]
    ObjectNotFound(String),

    /// The object exists but has no custom property with the given name.
    #[error("Object '{object}' has no property '{property}'")]
    PropertyNotFound { object: String, property: String },

    /// A raw value could not be coerced to the stored property type.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Any fault internal to the scene collaborator.
    #[error("{0}")]
    Internal(String),
}
