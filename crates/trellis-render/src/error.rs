//! Error types for the render crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during geometry and rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// An image file could not be opened or decoded.
    #[error("failed to load texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A regular polygon was requested with invalid parameters.
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    /// A distance string could not be decoded.
    #[error("invalid distance {input:?}: {reason}")]
    InvalidDistance { input: String, reason: String },

    /// A text pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// An unknown collision method code was supplied.
    #[error("unknown collision method {0}; expected 0, 1, 2, or 3")]
    UnknownCollisionMethod(u8),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
