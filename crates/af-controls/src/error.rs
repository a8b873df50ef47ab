//! Error types for control operations.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur in control operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Rejected at configuration time; cycles never see invalid config.
    #[error("Invalid configuration: {what}")]
    InvalidConfig { what: String },

    /// The control script failed to compile, run, or return four numbers.
    #[error("Control script error: {message}")]
    Script { message: String },
}
