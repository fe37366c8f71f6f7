//! Error types for the photon baker.

use thiserror::Error;

/// Main error type for extraction and bake operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Volume or bake parameters outside their valid domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mesh buffers that cannot be turned into triangles
    #[error("Malformed mesh '{mesh}': {reason}")]
    MalformedMesh { mesh: String, reason: String },

    /// Sample array does not match the lattice it claims to cover
    #[error("Sample count mismatch: expected {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },

    /// Extraction abandoned because the scene was invalidated
    #[error("Operation cancelled")]
    Cancelled,

    /// Failure reported by a rendering backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid parameter error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a malformed mesh error for the named mesh.
    pub fn malformed(mesh: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedMesh {
            mesh: mesh.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend error from a string.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Result type alias for photon operations.
pub type Result<T> = std::result::Result<T, Error>;
