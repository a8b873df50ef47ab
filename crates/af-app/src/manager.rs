//! The active-fin control manager and its background loop.
//!
//! One manager owns one control loop. The loop runs on a dedicated
//! thread; every component call happens inside that thread, so the only
//! cross-thread traffic is the explicitly synchronized fields below:
//! the lifecycle flags (atomics) and the config/target/command/state
//! cells (mutexes). External callers — status endpoints, the CLI — only
//! ever read through those cells and can never observe a torn update.
//!
//! Error containment: every component the cycle calls is total
//! (ingestion failures default, sandbox failures fail safe, actuation
//! failures keep the last-good artifact), so a cycle can fail but the
//! loop cannot die. A failed cycle is followed by a short backoff; the
//! loop exits only on an explicit stop signal.

use crate::error::AppResult;
use crate::telemetry::CycleLog;
use af_controls::{
    ActuatorCommand, ControlConfig, SURFACE_COUNT, ScriptSandbox, TargetTrajectory,
};
use af_core::CaseLayout;
use af_geometry::{SurfaceActuator, SurfaceBinding, SurfaceSpec, default_specs, load_bindings};
use af_state::{CfdState, IntegratorOptions, StateEstimator};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Bound on how long `stop` waits for the loop thread before detaching.
pub const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Sleep granularity inside the loop; the stop flag is re-checked at
/// least this often.
const STOP_POLL: Duration = Duration::from_millis(20);

/// Pause after a failed cycle before the next attempt.
const ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Externally visible lifecycle and actuation state.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerStatus {
    pub running: bool,
    pub enabled: bool,
    pub current_command: Option<ActuatorCommand>,
}

/// Fields shared between the loop thread and external callers.
#[derive(Debug, Default)]
struct SharedState {
    running: AtomicBool,
    stop: AtomicBool,
    current_command: Mutex<Option<ActuatorCommand>>,
    last_error: Mutex<Option<String>>,
}

/// Everything the loop thread needs, cloned out of the manager at start.
struct LoopContext {
    config: Arc<Mutex<ControlConfig>>,
    target: Arc<Mutex<TargetTrajectory>>,
    estimator: Arc<Mutex<StateEstimator>>,
    bindings: Arc<Vec<SurfaceBinding>>,
    actuator: SurfaceActuator,
    shared: Arc<SharedState>,
    log: Option<CycleLog>,
}

/// The control manager: lifecycle, configuration, and status surface for
/// one active-fin control loop.
pub struct FinControlManager {
    layout: CaseLayout,
    config: Arc<Mutex<ControlConfig>>,
    target: Arc<Mutex<TargetTrajectory>>,
    estimator: Arc<Mutex<StateEstimator>>,
    bindings: Arc<Vec<SurfaceBinding>>,
    shared: Arc<SharedState>,
    log: Option<CycleLog>,
    handle: Option<JoinHandle<()>>,
}

/// A poisoned cell means a panic elsewhere already aborted a cycle; the
/// data itself (plain values, replaced wholesale) is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

impl FinControlManager {
    /// Manager over `case_dir` with the default configuration and the
    /// reference 4-fin binding layout.
    pub fn new(case_dir: impl AsRef<Path>) -> AppResult<Self> {
        Self::with_specs(case_dir, &default_specs())
    }

    /// Manager with an explicit surface layout.
    pub fn with_specs(case_dir: impl AsRef<Path>, specs: &[SurfaceSpec]) -> AppResult<Self> {
        let layout = CaseLayout::new(case_dir.as_ref());
        let config = ControlConfig::default();
        let estimator = StateEstimator::with_options(
            layout.clone(),
            IntegratorOptions {
                convert_angular_rate: config.convert_angular_rate,
            },
        );
        let bindings = load_bindings(specs)?;

        Ok(Self {
            layout,
            config: Arc::new(Mutex::new(config)),
            target: Arc::new(Mutex::new(TargetTrajectory::default())),
            estimator: Arc::new(Mutex::new(estimator)),
            bindings: Arc::new(bindings),
            shared: Arc::new(SharedState::default()),
            log: None,
            handle: None,
        })
    }

    /// Attach a per-cycle telemetry log. Takes effect at the next start.
    pub fn set_cycle_log(&mut self, log: Option<CycleLog>) {
        self.log = log;
    }

    /// Replace the configuration wholesale. Unspecified fields fall back
    /// to documented defaults; invalid values are rejected here rather
    /// than surfacing as cycle failures. A running loop picks the new
    /// configuration up on its next cycle.
    pub fn update_config(&self, value: serde_json::Value) -> AppResult<()> {
        let new_config = ControlConfig::from_value(value)?;

        let mut config = lock(&self.config);
        if new_config.convert_angular_rate != config.convert_angular_rate {
            // The integration variant is baked into the estimator, and
            // mixing variants mid-history would be meaningless: start a
            // fresh estimator with zeroed internal state.
            *lock(&self.estimator) = StateEstimator::with_options(
                self.layout.clone(),
                IntegratorOptions {
                    convert_angular_rate: new_config.convert_angular_rate,
                },
            );
        }
        *config = new_config;
        Ok(())
    }

    pub fn config(&self) -> ControlConfig {
        lock(&self.config).clone()
    }

    pub fn set_target(&self, target: TargetTrajectory) {
        *lock(&self.target) = target;
    }

    pub fn target(&self) -> TargetTrajectory {
        *lock(&self.target)
    }

    /// Start the control loop. A no-op if the loop is already running.
    pub fn start(&mut self) -> AppResult<()> {
        if self.is_running() {
            return Ok(());
        }
        // Reap a previously finished thread before restarting.
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }

        self.shared.stop.store(false, Ordering::SeqCst);
        self.shared.running.store(true, Ordering::SeqCst);

        let ctx = LoopContext {
            config: Arc::clone(&self.config),
            target: Arc::clone(&self.target),
            estimator: Arc::clone(&self.estimator),
            bindings: Arc::clone(&self.bindings),
            actuator: SurfaceActuator::new(self.layout.clone()),
            shared: Arc::clone(&self.shared),
            log: self.log.clone(),
        };

        let handle = thread::Builder::new()
            .name("af-control-loop".to_string())
            .spawn(move || run_loop(ctx))?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Signal the loop to stop and wait for it, bounded by
    /// [`STOP_TIMEOUT`]. A no-op when idle.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.shared.stop.store(true, Ordering::SeqCst);

        let deadline = Instant::now() + STOP_TIMEOUT;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        if handle.is_finished() {
            let _ = handle.join();
        } else {
            warn!(timeout = ?STOP_TIMEOUT, "control loop did not stop in time, detaching");
            // The detached thread keeps the old shared cell with its stop
            // flag raised; future starts get a fresh cell so they cannot
            // resurrect it.
            self.shared = Arc::new(SharedState::default());
            return;
        }
        self.shared.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && self.shared.running.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> ManagerStatus {
        ManagerStatus {
            running: self.is_running(),
            enabled: lock(&self.config).enabled,
            current_command: *lock(&self.shared.current_command),
        }
    }

    /// Run one sandbox evaluation against the supplied state and target
    /// without touching the loop, for diagnostics. Evaluation failures
    /// are recorded the same way a cycle's would be.
    pub fn test_evaluate(
        &self,
        state: &CfdState,
        target: &TargetTrajectory,
    ) -> [f64; SURFACE_COUNT] {
        let source = lock(&self.config).algorithm_source.clone();
        let mut sandbox = ScriptSandbox::new();
        let raw = sandbox.evaluate(&source, state, target);
        if let Some(err) = sandbox.last_error() {
            *lock(&self.shared.last_error) = Some(err.to_string());
        }
        raw
    }

    /// The estimator's most recent snapshot, or the fail-safe default.
    pub fn latest_state(&self) -> CfdState {
        lock(&self.estimator).latest_or_default()
    }

    /// The last `n` produced snapshots, oldest first.
    pub fn state_history(&self, n: usize) -> Vec<CfdState> {
        lock(&self.estimator).history(n)
    }

    /// Most recent recoverable failure, if any.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.shared.last_error).clone()
    }
}

impl Drop for FinControlManager {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The loop body: tick until stopped, re-reading the configuration each
/// cycle so concurrent reconfiguration applies on the next cycle.
fn run_loop(ctx: LoopContext) {
    debug!("control loop started");
    while !ctx.shared.stop.load(Ordering::SeqCst) {
        let config = lock(&ctx.config).clone();

        if !config.enabled {
            sleep_with_stop(&ctx.shared.stop, config.cycle_period());
            continue;
        }

        let ok = run_cycle(&ctx, &config);
        if !ok {
            sleep_with_stop(&ctx.shared.stop, ERROR_BACKOFF);
            continue;
        }

        sleep_with_stop(&ctx.shared.stop, config.cycle_period());
    }
    ctx.shared.running.store(false, Ordering::SeqCst);
    debug!("control loop stopped");
}

/// One control cycle: extract → evaluate → clamp → actuate → publish.
///
/// A sandbox failure is not a cycle failure — the fail-safe zero command
/// still actuates the surfaces to neutral. Only actuation failure marks
/// the cycle failed (last-good artifacts stay in place).
fn run_cycle(ctx: &LoopContext, config: &ControlConfig) -> bool {
    let target = *lock(&ctx.target);

    let state = lock(&ctx.estimator).extract(config.time_step_s);

    let mut sandbox = ScriptSandbox::new();
    let raw = sandbox.evaluate(&config.algorithm_source, &state, &target);
    if let Some(err) = sandbox.last_error() {
        *lock(&ctx.shared.last_error) = Some(err.to_string());
    }

    let command = ActuatorCommand::clamped(state.timestamp_s, raw, config.deflection_limit_deg);

    let actuated = ctx.actuator.actuate(&command, &ctx.bindings);
    if !actuated {
        *lock(&ctx.shared.last_error) = Some("surface actuation failed".to_string());
    }

    *lock(&ctx.shared.current_command) = Some(command);

    if let Some(log) = &ctx.log {
        if let Err(err) = log.append(&state, &command) {
            warn!(%err, "cycle telemetry append failed");
        }
    }

    actuated
}

/// Sleep for `total`, waking early when the stop flag is raised.
fn sleep_with_stop(stop: &AtomicBool, total: Duration) {
    let deadline = Instant::now() + total;
    while !stop.load(Ordering::SeqCst) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        thread::sleep(remaining.min(STOP_POLL));
    }
}
