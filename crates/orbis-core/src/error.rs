//! Error types for orbis.

use thiserror::Error;

/// The main error type for orbis operations.
///
/// The per-frame control loop never fails; these errors come from
/// construction, configuration and use of a destroyed view.
#[derive(Error, Debug)]
pub enum OrbisError {
    /// Zoom bounds where the minimum exceeds the maximum.
    #[error("invalid distance bounds: min {min} is greater than max {max}")]
    InvalidDistanceBounds { min: f32, max: f32 },

    /// An option value outside of its accepted range.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// Two markers registered for the same country identifier.
    #[error("marker for country '{0}' already exists")]
    DuplicateMarker(String),

    /// A marker whose country has no geographic center to anchor it.
    #[error("marker for country '{0}' has no center coordinate")]
    MissingCenter(String),

    /// A surface part without any triangle.
    #[error("surface part for country '{0}' has no triangles")]
    EmptySurface(String),

    /// The view was destroyed and can no longer be driven.
    #[error("globe view has been destroyed")]
    Destroyed,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for orbis operations.
pub type Result<T> = std::result::Result<T, OrbisError>;
