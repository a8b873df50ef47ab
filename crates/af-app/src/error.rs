//! Error types for the af-app service layer.

/// Application error type that wraps errors from the backend crates and
/// provides a unified interface for CLI and API consumers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Control error: {0}")]
    Control(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for af-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<af_controls::ControlError> for AppError {
    fn from(err: af_controls::ControlError) -> Self {
        match err {
            af_controls::ControlError::InvalidConfig { .. } => AppError::Config(err.to_string()),
            af_controls::ControlError::Script { .. } => AppError::Control(err.to_string()),
        }
    }
}

impl From<af_geometry::GeometryError> for AppError {
    fn from(err: af_geometry::GeometryError) -> Self {
        AppError::Geometry(err.to_string())
    }
}

impl From<af_core::AfError> for AppError {
    fn from(err: af_core::AfError) -> Self {
        AppError::Control(err.to_string())
    }
}
