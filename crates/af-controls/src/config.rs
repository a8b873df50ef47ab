//! Control loop configuration.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for one control manager.
///
/// Replaced wholesale on reconfiguration — the running loop reads the
/// active config fresh at the top of every cycle, so a replacement takes
/// effect on the next cycle and a cycle never observes a partial update.
///
/// Deserialization accepts partial objects; unspecified fields fall back
/// to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Whether cycles do any work. The loop thread keeps ticking while
    /// disabled so that enabling takes effect without a restart.
    pub enabled: bool,
    /// Solver time step handed to the state estimator (seconds).
    pub time_step_s: f64,
    /// Control cycle rate (Hz).
    pub update_rate_hz: u32,
    /// Hardware deflection limit, applied symmetrically (degrees).
    pub deflection_limit_deg: f64,
    /// Tuning gains for operator tooling. Not exposed to the script.
    pub gains: BTreeMap<String, f64>,
    /// Source text of the control algorithm.
    pub algorithm_source: String,
    /// Use the unit-corrected attitude integration variant.
    pub convert_angular_rate: bool,
}

fn default_gains() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("kp".to_string(), 1.0),
        ("ki".to_string(), 0.1),
        ("kd".to_string(), 0.05),
    ])
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            time_step_s: 0.01,
            update_rate_hz: 100,
            deflection_limit_deg: 15.0,
            gains: default_gains(),
            algorithm_source: String::new(),
            convert_angular_rate: false,
        }
    }
}

impl ControlConfig {
    /// Build a config from a (possibly partial) JSON object and validate
    /// it. This is the only path by which external configuration enters
    /// the system.
    pub fn from_value(value: serde_json::Value) -> ControlResult<Self> {
        let config: Self =
            serde_json::from_value(value).map_err(|err| ControlError::InvalidConfig {
                what: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations a cycle could not run with.
    pub fn validate(&self) -> ControlResult<()> {
        if !self.time_step_s.is_finite() || self.time_step_s <= 0.0 {
            return Err(ControlError::InvalidConfig {
                what: format!("time_step_s must be positive, got {}", self.time_step_s),
            });
        }
        if self.update_rate_hz == 0 {
            return Err(ControlError::InvalidConfig {
                what: "update_rate_hz must be at least 1".to_string(),
            });
        }
        if !self.deflection_limit_deg.is_finite() || self.deflection_limit_deg < 0.0 {
            return Err(ControlError::InvalidConfig {
                what: format!(
                    "deflection_limit_deg must be non-negative, got {}",
                    self.deflection_limit_deg
                ),
            });
        }
        for (name, value) in &self.gains {
            if !value.is_finite() {
                return Err(ControlError::InvalidConfig {
                    what: format!("gain '{name}' is not finite"),
                });
            }
        }
        Ok(())
    }

    /// Inter-cycle sleep interval.
    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.update_rate_hz))
    }
}

/// Commanded trajectory the control algorithm steers toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTrajectory {
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

impl Default for TargetTrajectory {
    fn default() -> Self {
        Self {
            pitch_deg: 0.0,
            yaw_deg: 0.0,
        }
    }
}
