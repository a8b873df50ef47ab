//! Rate-limited state extraction.

use crate::history::StateHistory;
use crate::kinematics::{IntegratorOptions, KinematicIntegrator};
use crate::state::CfdState;
use crate::tables;
use af_core::CaseLayout;
use std::time::{Duration, Instant};

/// Two extractions closer together than this return the cached snapshot,
/// capping the effective extraction rate at 100 Hz regardless of caller
/// cadence.
pub const MIN_EXTRACTION_INTERVAL: Duration = Duration::from_millis(10);

/// Turns solver post-processing artifacts into [`CfdState`] snapshots.
///
/// The estimator owns all cross-call state: the integrator's previous
/// attitude/rates/position, the extraction cache, and the snapshot
/// history. Construct one per control manager; timestamps are seconds
/// since construction on the monotonic clock.
///
/// `extract` is infallible: every ingestion failure degrades to that
/// artifact's neutral default, and a total failure with no cache yields
/// [`CfdState::default`].
#[derive(Debug)]
pub struct StateEstimator {
    layout: CaseLayout,
    integrator: KinematicIntegrator,
    history: StateHistory,
    epoch: Instant,
    last_extraction: Option<Instant>,
    cache: Option<CfdState>,
}

impl StateEstimator {
    pub fn new(layout: CaseLayout) -> Self {
        Self::with_options(layout, IntegratorOptions::default())
    }

    pub fn with_options(layout: CaseLayout, options: IntegratorOptions) -> Self {
        Self {
            layout,
            integrator: KinematicIntegrator::new(options),
            history: StateHistory::default(),
            epoch: Instant::now(),
            last_extraction: None,
            cache: None,
        }
    }

    /// Produce the current state estimate for solver time step `dt`
    /// (seconds, > 0 — enforced where the step is configured).
    pub fn extract(&mut self, dt: f64) -> CfdState {
        if let Some(last) = self.last_extraction
            && last.elapsed() < MIN_EXTRACTION_INTERVAL
            && let Some(cached) = &self.cache
        {
            return cached.clone();
        }

        let forces = tables::read_forces_table(&self.layout.forces_table());
        let pressure = tables::read_pressure_table(&self.layout.pressure_table());
        let velocity = tables::read_velocity_table(&self.layout.velocity_table());

        self.integrator
            .step(forces.moments_n_m, velocity.mean_m_s, dt);

        let state = CfdState {
            timestamp_s: self.epoch.elapsed().as_secs_f64(),
            attitude_deg: self.integrator.attitude_deg(),
            velocity_m_s: velocity.mean_m_s,
            position_m: self.integrator.position_m(),
            angular_velocity_rad_s: self.integrator.angular_velocity_rad_s(),
            forces_n: forces.forces_n,
            moments_n_m: forces.moments_n_m,
            pressure_pa: pressure.mean_pa,
            ..CfdState::default()
        };

        self.history.push(state.clone());
        self.cache = Some(state.clone());
        self.last_extraction = Some(Instant::now());
        state
    }

    /// Most recent snapshot, if any extraction has happened.
    pub fn latest(&self) -> Option<&CfdState> {
        self.cache.as_ref()
    }

    /// Most recent snapshot, or the fail-safe default.
    pub fn latest_or_default(&self) -> CfdState {
        self.cache.clone().unwrap_or_default()
    }

    /// The last `n` produced snapshots, oldest first.
    pub fn history(&self, n: usize) -> Vec<CfdState> {
        self.history.last_n(n)
    }
}
