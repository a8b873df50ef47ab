//! Kinematic state estimation from solver post-processing output.
//!
//! The external CFD solver periodically appends to a forces/moments table
//! and rewrites field extremum tables. This crate turns those artifacts
//! into a [`CfdState`] snapshot:
//!
//! - table parsing with per-artifact neutral defaults (`tables`)
//! - explicit-Euler rigid-body integration (`kinematics`)
//! - rate-limited, cache-backed extraction (`estimator`)
//! - a bounded history of produced snapshots (`history`)
//!
//! Ingestion failures are local and silent by design: a missing or
//! malformed artifact degrades that quantity to a documented default and
//! the extraction as a whole always yields a state.

pub mod estimator;
pub mod history;
pub mod kinematics;
pub mod state;
pub mod tables;

pub use estimator::{MIN_EXTRACTION_INTERVAL, StateEstimator};
pub use history::{HISTORY_CAPACITY, StateHistory};
pub use kinematics::{INERTIA_KG_M2, IntegratorOptions, KinematicIntegrator};
pub use state::{CfdState, STANDARD_PRESSURE_PA, STANDARD_TEMPERATURE_K};
pub use tables::{ForcesSample, PressureSample, VelocitySample};
