//! Error types for geometry operations.

use thiserror::Error;

/// Result type for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Errors that can occur in geometry operations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Invalid mesh: {what}")]
    InvalidMesh { what: String },

    #[error("Invalid rotation axis: {what}")]
    InvalidAxis { what: &'static str },

    #[error("STL parse error: {what}")]
    StlParse { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
