//! The instantaneous kinematic/aerodynamic snapshot.

use serde::{Deserialize, Serialize};

/// Sea-level standard atmosphere, used whenever the pressure table yields
/// nothing usable.
pub const STANDARD_PRESSURE_PA: f64 = 101_325.0;

/// The solver runs isothermal cases; temperature is reported as a constant.
pub const STANDARD_TEMPERATURE_K: f64 = 288.0;

/// One extraction's view of the vehicle: attitude, rates, position and the
/// aerodynamic quantities they were derived from.
///
/// Snapshots are immutable; each extraction produces a new value and the
/// previous one is superseded, never mutated. `timestamp_s` is seconds
/// since the owning estimator was created (monotonic, so timestamps never
/// decrease across extractions from the same estimator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfdState {
    pub timestamp_s: f64,
    /// Roll, pitch, yaw in degrees.
    pub attitude_deg: [f64; 3],
    pub velocity_m_s: [f64; 3],
    pub position_m: [f64; 3],
    pub angular_velocity_rad_s: [f64; 3],
    pub forces_n: [f64; 3],
    pub moments_n_m: [f64; 3],
    pub pressure_pa: f64,
    pub temperature_k: f64,
}

impl Default for CfdState {
    fn default() -> Self {
        Self {
            timestamp_s: 0.0,
            attitude_deg: [0.0; 3],
            velocity_m_s: [0.0; 3],
            position_m: [0.0; 3],
            angular_velocity_rad_s: [0.0; 3],
            forces_n: [0.0; 3],
            moments_n_m: [0.0; 3],
            pressure_pa: STANDARD_PRESSURE_PA,
            temperature_k: STANDARD_TEMPERATURE_K,
        }
    }
}
