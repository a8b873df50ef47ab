//! Rigid-body state integration.
//!
//! Explicit Euler with fixed, hardcoded principal moments of inertia. The
//! model is intentionally coarse: moments from the solver drive angular
//! acceleration, angular velocity integrates into attitude, and the
//! representative field velocity integrates into position.

/// Principal moments of inertia about x, y, z (kg·m²).
pub const INERTIA_KG_M2: [f64; 3] = [0.1, 0.1, 0.05];

/// Integration options.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntegratorOptions {
    /// When set, angular velocity (rad/s) is converted to deg/s before the
    /// attitude update. The historical behavior — kept as the default —
    /// adds rad/s·s directly onto the degree-valued attitude, so results
    /// produced with this flag differ by a factor of 180/π per axis.
    pub convert_angular_rate: bool,
}

/// Explicit-Euler integrator carrying its own previous state.
///
/// `omega += (M / I) * dt`, `attitude += omega * dt`,
/// `position += v * dt`, all starting from zero vectors.
#[derive(Debug, Clone, Default)]
pub struct KinematicIntegrator {
    options: IntegratorOptions,
    omega_rad_s: [f64; 3],
    attitude_deg: [f64; 3],
    position_m: [f64; 3],
}

impl KinematicIntegrator {
    pub fn new(options: IntegratorOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Advance one step. `dt` is the solver time step in seconds.
    pub fn step(&mut self, moments_n_m: [f64; 3], velocity_m_s: [f64; 3], dt: f64) {
        for axis in 0..3 {
            let alpha = moments_n_m[axis] / INERTIA_KG_M2[axis];
            self.omega_rad_s[axis] += alpha * dt;

            let rate = if self.options.convert_angular_rate {
                self.omega_rad_s[axis].to_degrees()
            } else {
                self.omega_rad_s[axis]
            };
            self.attitude_deg[axis] += rate * dt;

            self.position_m[axis] += velocity_m_s[axis] * dt;
        }
    }

    pub fn angular_velocity_rad_s(&self) -> [f64; 3] {
        self.omega_rad_s
    }

    pub fn attitude_deg(&self) -> [f64; 3] {
        self.attitude_deg
    }

    pub fn position_m(&self) -> [f64; 3] {
        self.position_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_core::{Tolerances, nearly_equal};

    fn tol() -> Tolerances {
        Tolerances::default()
    }

    #[test]
    fn roll_moment_integrates() {
        let mut integ = KinematicIntegrator::default();
        integ.step([0.01, 0.0, 0.0], [0.0; 3], 0.1);

        // alpha_x = 0.01 / 0.1 = 0.1; omega_x = 0.01; roll = 0.001
        assert!(nearly_equal(integ.angular_velocity_rad_s()[0], 0.01, tol()));
        assert!(nearly_equal(integ.attitude_deg()[0], 0.001, tol()));

        integ.step([0.01, 0.0, 0.0], [0.0; 3], 0.1);
        assert!(nearly_equal(integ.angular_velocity_rad_s()[0], 0.02, tol()));
        assert!(nearly_equal(integ.attitude_deg()[0], 0.003, tol()));
    }

    #[test]
    fn yaw_axis_uses_smaller_inertia() {
        let mut integ = KinematicIntegrator::default();
        integ.step([0.0, 0.0, 0.01], [0.0; 3], 0.1);
        // alpha_z = 0.01 / 0.05 = 0.2; omega_z = 0.02
        assert!(nearly_equal(integ.angular_velocity_rad_s()[2], 0.02, tol()));
    }

    #[test]
    fn position_from_velocity() {
        let mut integ = KinematicIntegrator::default();
        integ.step([0.0; 3], [10.0, 0.0, -2.0], 0.5);
        assert_eq!(integ.position_m(), [5.0, 0.0, -1.0]);
    }

    #[test]
    fn converted_rate_differs_by_degrees_factor() {
        let mut raw = KinematicIntegrator::default();
        let mut converted = KinematicIntegrator::new(IntegratorOptions {
            convert_angular_rate: true,
        });
        raw.step([0.01, 0.0, 0.0], [0.0; 3], 0.1);
        converted.step([0.01, 0.0, 0.0], [0.0; 3], 0.1);

        let ratio = converted.attitude_deg()[0] / raw.attitude_deg()[0];
        assert!((ratio - 180.0 / std::f64::consts::PI).abs() < 1e-9);
    }
}
