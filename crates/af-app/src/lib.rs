//! af-app: the active-fin control manager.
//!
//! Ties the backend crates together into one service surface: a
//! background control loop (estimate → evaluate → clamp → actuate on a
//! fixed cadence) plus the lifecycle, configuration, and status calls an
//! API layer consumes. All functionality is shared between the CLI and
//! any other frontend.

pub mod error;
pub mod manager;
pub mod telemetry;

pub use error::{AppError, AppResult};
pub use manager::{FinControlManager, ManagerStatus, STOP_TIMEOUT};
pub use telemetry::CycleLog;
