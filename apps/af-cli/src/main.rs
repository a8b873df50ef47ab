use af_app::{AppResult, CycleLog, FinControlManager};
use af_controls::TargetTrajectory;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "af-cli")]
#[command(about = "AeroFin CLI - active fin control loop tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the control loop against a solver case directory
    Run {
        /// Path to the solver case directory
        case_dir: PathBuf,
        /// Path to the control algorithm script
        script: PathBuf,
        /// How long to run (seconds)
        #[arg(long, default_value_t = 10.0)]
        duration: f64,
        /// Control cycle rate (Hz)
        #[arg(long, default_value_t = 100)]
        rate: u32,
        /// Deflection limit (degrees)
        #[arg(long, default_value_t = 15.0)]
        limit: f64,
        /// Target pitch (degrees)
        #[arg(long, default_value_t = 0.0)]
        pitch: f64,
        /// Target yaw (degrees)
        #[arg(long, default_value_t = 0.0)]
        yaw: f64,
        /// Write per-cycle telemetry to this jsonl file
        #[arg(short, long)]
        log: Option<PathBuf>,
    },
    /// Extract one state snapshot from a case directory
    Extract {
        /// Path to the solver case directory
        case_dir: PathBuf,
        /// Solver time step (seconds)
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
    },
    /// Evaluate a control script once against the current state
    Evaluate {
        /// Path to the solver case directory
        case_dir: PathBuf,
        /// Path to the control algorithm script
        script: PathBuf,
        /// Target pitch (degrees)
        #[arg(long, default_value_t = 0.0)]
        pitch: f64,
        /// Target yaw (degrees)
        #[arg(long, default_value_t = 0.0)]
        yaw: f64,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            case_dir,
            script,
            duration,
            rate,
            limit,
            pitch,
            yaw,
            log,
        } => cmd_run(
            &case_dir, &script, duration, rate, limit, pitch, yaw, log,
        ),
        Commands::Extract { case_dir, dt } => cmd_extract(&case_dir, dt),
        Commands::Evaluate {
            case_dir,
            script,
            pitch,
            yaw,
        } => cmd_evaluate(&case_dir, &script, pitch, yaw),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    case_dir: &Path,
    script: &Path,
    duration: f64,
    rate: u32,
    limit: f64,
    pitch: f64,
    yaw: f64,
    log: Option<PathBuf>,
) -> AppResult<()> {
    println!("Running active fin control for case: {}", case_dir.display());
    println!("  rate = {rate} Hz, limit = ±{limit}°, duration = {duration} s");

    let source = std::fs::read_to_string(script)?;

    let mut manager = FinControlManager::new(case_dir)?;
    if let Some(path) = log {
        let cycle_log = CycleLog::create(&path)?;
        println!("  telemetry -> {}", cycle_log.path().display());
        manager.set_cycle_log(Some(cycle_log));
    }

    manager.update_config(serde_json::json!({
        "enabled": true,
        "update_rate_hz": rate,
        "deflection_limit_deg": limit,
        "algorithm_source": source,
    }))?;
    manager.set_target(TargetTrajectory {
        pitch_deg: pitch,
        yaw_deg: yaw,
    });

    manager.start()?;
    std::thread::sleep(Duration::from_secs_f64(duration));
    manager.stop();

    let status = manager.status();
    match status.current_command {
        Some(command) => {
            println!("✓ Loop finished");
            println!("  final command: {:?}", command.deflections_deg);
        }
        None => println!("✓ Loop finished (no cycles executed)"),
    }
    if let Some(err) = manager.last_error() {
        println!("  last recoverable error: {err}");
    }
    let state = manager.latest_state();
    println!(
        "  attitude = [{:.4}, {:.4}, {:.4}]°",
        state.attitude_deg[0], state.attitude_deg[1], state.attitude_deg[2]
    );

    Ok(())
}

fn cmd_extract(case_dir: &Path, dt: f64) -> AppResult<()> {
    let mut estimator = af_state::StateEstimator::new(af_core::CaseLayout::new(case_dir));
    let state = estimator.extract(dt);
    println!(
        "{}",
        serde_json::to_string_pretty(&state).map_err(std::io::Error::other)?
    );
    Ok(())
}

fn cmd_evaluate(case_dir: &Path, script: &Path, pitch: f64, yaw: f64) -> AppResult<()> {
    let source = std::fs::read_to_string(script)?;

    let manager = FinControlManager::new(case_dir)?;
    manager.update_config(serde_json::json!({ "algorithm_source": source }))?;

    let state = manager.latest_state();
    let target = TargetTrajectory {
        pitch_deg: pitch,
        yaw_deg: yaw,
    };
    let raw = manager.test_evaluate(&state, &target);

    println!("✓ Script evaluated");
    println!("  raw deflections: {raw:?}");
    if let Some(err) = manager.last_error() {
        println!("  error: {err}");
    }
    Ok(())
}
