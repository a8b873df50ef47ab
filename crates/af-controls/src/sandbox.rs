//! Capability-restricted evaluation of the operator-supplied control
//! algorithm.
//!
//! The algorithm arrives as arbitrary script text and must define
//!
//! ```rhai
//! fn calculate_fin_deflections(state, target) {
//!     // state: timestamp_s, attitude_deg, velocity_m_s, position_m,
//!     //        angular_velocity_rad_s, pressure_pa, temperature_k, ...
//!     // target: pitch_deg, yaw_deg
//!     [0.0, 0.0, 0.0, 0.0] // degrees, one per surface
//! }
//! ```
//!
//! Every invocation runs in a freshly constructed engine and scope, so no
//! state survives between cycles. The engine has no filesystem, network,
//! process, or environment surface, and carries operation/recursion/depth
//! budgets so a pathological script terminates instead of stalling the
//! control loop. Any failure — compile error, missing function, runtime
//! throw, short or non-numeric return, exhausted budget — degrades to the
//! neutral [`FAIL_SAFE_DEFLECTIONS`] and is recorded for operator
//! visibility; the loop never stops because a script misbehaved.

use crate::command::SURFACE_COUNT;
use crate::error::{ControlError, ControlResult};
use rhai::{Array, Engine, Scope};
use serde::Serialize;
use tracing::warn;

/// Function the control algorithm must define.
pub const CONTROL_FN: &str = "calculate_fin_deflections";

/// Neutral command returned whenever evaluation fails.
pub const FAIL_SAFE_DEFLECTIONS: [f64; SURFACE_COUNT] = [0.0; SURFACE_COUNT];

/// Script operation budget per evaluation. At the reference 100 Hz cycle
/// rate this bounds a runaway script well under one cycle period.
const MAX_OPERATIONS: u64 = 100_000;
const MAX_CALL_LEVELS: usize = 32;
const MAX_EXPR_DEPTH: usize = 64;

/// Evaluates control scripts and remembers the most recent failure.
#[derive(Debug, Default)]
pub struct ScriptSandbox {
    last_error: Option<String>,
}

impl ScriptSandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `source` against `state` and `target`, returning the raw
    /// (unclamped) per-surface deflections in degrees.
    ///
    /// Total: failures yield [`FAIL_SAFE_DEFLECTIONS`] and are retrievable
    /// via [`Self::last_error`] until the next successful evaluation.
    pub fn evaluate<S, T>(&mut self, source: &str, state: &S, target: &T) -> [f64; SURFACE_COUNT]
    where
        S: Serialize,
        T: Serialize,
    {
        match Self::try_evaluate(source, state, target) {
            Ok(deflections) => {
                self.last_error = None;
                deflections
            }
            Err(err) => {
                warn!(%err, "control script evaluation failed, commanding neutral deflections");
                self.last_error = Some(err.to_string());
                FAIL_SAFE_DEFLECTIONS
            }
        }
    }

    /// The fallible evaluation path.
    pub fn try_evaluate<S, T>(
        source: &str,
        state: &S,
        target: &T,
    ) -> ControlResult<[f64; SURFACE_COUNT]>
    where
        S: Serialize,
        T: Serialize,
    {
        let mut engine = Engine::new();
        engine.set_max_operations(MAX_OPERATIONS);
        engine.set_max_call_levels(MAX_CALL_LEVELS);
        engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_EXPR_DEPTH);

        let ast = engine.compile(source).map_err(script_error)?;

        let state = rhai::serde::to_dynamic(state).map_err(script_error)?;
        let target = rhai::serde::to_dynamic(target).map_err(script_error)?;

        let mut scope = Scope::new();
        let result: Array = engine
            .call_fn(&mut scope, &ast, CONTROL_FN, (state, target))
            .map_err(script_error)?;

        if result.len() < SURFACE_COUNT {
            return Err(ControlError::Script {
                message: format!(
                    "{CONTROL_FN} returned {} values, expected {SURFACE_COUNT}",
                    result.len()
                ),
            });
        }

        let mut deflections = [0.0_f64; SURFACE_COUNT];
        for (slot, value) in deflections.iter_mut().zip(result.into_iter()) {
            *slot = value
                .as_float()
                .or_else(|_| value.as_int().map(|i| i as f64))
                .map_err(|type_name| ControlError::Script {
                    message: format!("{CONTROL_FN} returned non-numeric value of type {type_name}"),
                })?;
        }
        Ok(deflections)
    }

    /// Message of the most recent failed evaluation, if the last
    /// evaluation failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

fn script_error(err: impl ToString) -> ControlError {
    ControlError::Script {
        message: err.to_string(),
    }
}
