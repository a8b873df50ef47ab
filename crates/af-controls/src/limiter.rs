//! Actuation limiting.
//!
//! A pure, total saturation of raw deflection commands to the configured
//! hardware bound. There are no error conditions here: a negative limit
//! is a configuration error caught when the configuration is applied
//! ([`crate::ControlConfig::validate`]), never at clamp time.

use crate::command::SURFACE_COUNT;
use af_core::saturate;

/// Clamp each raw deflection to `[-limit_deg, limit_deg]`.
pub fn clamp(raw: [f64; SURFACE_COUNT], limit_deg: f64) -> [f64; SURFACE_COUNT] {
    raw.map(|d| saturate(d, limit_deg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ActuatorCommand;

    #[test]
    fn reference_clamping_example() {
        let clamped = clamp([20.0, -20.0, 5.0, 0.0], 15.0);
        assert_eq!(clamped, [15.0, -15.0, 5.0, 0.0]);
    }

    #[test]
    fn zero_limit_pins_everything() {
        assert_eq!(clamp([1.0, -1.0, 100.0, 0.0], 0.0), [0.0; 4]);
    }

    #[test]
    fn command_packaging_applies_the_limit() {
        let command = ActuatorCommand::clamped(1.0, [20.0, -20.0, 5.0, 0.0], 15.0);
        assert_eq!(command.timestamp_s, 1.0);
        assert_eq!(command.deflections_deg, [15.0, -15.0, 5.0, 0.0]);
    }
}
