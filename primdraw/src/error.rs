//! Error types.

use thiserror::Error;

/// Result type for primdraw operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by stage setup, drawing and property overrides.
#[derive(Debug, Error)]
pub enum Error {
    /// No surface is registered under the requested identifier.
    #[error("no drawing surface with id {0:?}")]
    SurfaceNotFound(String),

    /// A color string could not be parsed.
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    /// Stage dimensions must be positive.
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// A property override was rejected.
    #[error(transparent)]
    Props(#[from] PropsError),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Reading a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The surface failed to carry out a draw call.
    #[error("render failed: {0}")]
    Render(String),

    /// Audio output or decoding failed.
    #[error("audio error: {0}")]
    Audio(#[source] anyhow::Error),
}

/// Errors raised when applying [`Props`](crate::Props) to a primitive.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropsError {
    /// The field exists on some primitive kinds but not on this one.
    #[error("property `{field}` does not apply to {kind}")]
    NotApplicable {
        field: &'static str,
        kind: &'static str,
    },
}
