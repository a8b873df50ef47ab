//! The clamped per-surface actuation command.

use crate::limiter;
use serde::{Deserialize, Serialize};

/// Number of controllable surfaces in the reference fin layout.
pub const SURFACE_COUNT: usize = 4;

/// One cycle's clamped deflection vector, degrees per surface. The most
/// recent instance is the externally observable actuation state; each
/// cycle produces a new one and the previous is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    pub timestamp_s: f64,
    pub deflections_deg: [f64; SURFACE_COUNT],
}

impl ActuatorCommand {
    /// Package raw deflections into a command, saturating each element to
    /// `[-limit_deg, limit_deg]`.
    pub fn clamped(timestamp_s: f64, raw: [f64; SURFACE_COUNT], limit_deg: f64) -> Self {
        Self {
            timestamp_s,
            deflections_deg: limiter::clamp(raw, limit_deg),
        }
    }

    /// The neutral zero-deflection command.
    pub fn neutral(timestamp_s: f64) -> Self {
        Self {
            timestamp_s,
            deflections_deg: [0.0; SURFACE_COUNT],
        }
    }
}
