//! Lifecycle and end-to-end behavior of the control loop.

use af_app::FinControlManager;
use af_controls::TargetTrajectory;
use af_state::CfdState;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

fn unique_temp_case(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "{prefix}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const CONSTANT_SCRIPT: &str =
    "fn calculate_fin_deflections(state, target) { [20.0, -20.0, 5.0, 0.0] }";

#[test]
fn start_is_idempotent_and_stop_is_bounded() {
    let case = unique_temp_case("af_app_lifecycle");
    let mut manager = FinControlManager::new(&case).unwrap();

    manager.start().unwrap();
    assert!(manager.status().running);
    // Second start: no second loop, still running.
    manager.start().unwrap();
    assert!(manager.status().running);

    manager.stop();
    assert!(!manager.status().running);

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn stop_while_idle_is_a_no_op() {
    let case = unique_temp_case("af_app_idle_stop");
    let mut manager = FinControlManager::new(&case).unwrap();

    manager.stop();
    assert!(!manager.status().running);

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn enabled_loop_produces_clamped_commands_and_artifacts() {
    let case = unique_temp_case("af_app_cycles");
    let mut manager = FinControlManager::new(&case).unwrap();

    manager
        .update_config(json!({
            "enabled": true,
            "update_rate_hz": 200,
            "deflection_limit_deg": 15.0,
            "algorithm_source": CONSTANT_SCRIPT,
        }))
        .unwrap();

    manager.start().unwrap();
    std::thread::sleep(Duration::from_millis(200));
    manager.stop();

    let status = manager.status();
    let command = status.current_command.expect("loop should have cycled");
    assert_eq!(command.deflections_deg, [15.0, -15.0, 5.0, 0.0]);

    // Geometry artifacts were regenerated.
    for id in ["fin1", "fin2", "fin3", "fin4"] {
        assert!(case.join("constant/triSurface").join(format!("{id}.stl")).exists());
    }

    // The estimator published a state snapshot.
    let state = manager.latest_state();
    assert!(state.timestamp_s > 0.0);
    assert!(!manager.state_history(10).is_empty());

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn disabled_loop_ticks_without_actuating() {
    let case = unique_temp_case("af_app_disabled");
    let mut manager = FinControlManager::new(&case).unwrap();

    // enabled defaults to false
    manager.start().unwrap();
    std::thread::sleep(Duration::from_millis(60));
    manager.stop();

    assert!(manager.status().current_command.is_none());
    assert!(!case.join("constant/triSurface").exists());

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn failing_script_degrades_to_neutral_and_loop_survives() {
    let case = unique_temp_case("af_app_failsafe");
    let mut manager = FinControlManager::new(&case).unwrap();

    manager
        .update_config(json!({
            "enabled": true,
            "update_rate_hz": 200,
            "algorithm_source": "fn calculate_fin_deflections(state, target) { throw \"bad\"; }",
        }))
        .unwrap();

    manager.start().unwrap();
    std::thread::sleep(Duration::from_millis(150));
    assert!(manager.status().running, "loop must survive script failures");
    manager.stop();

    let command = manager.status().current_command.unwrap();
    assert_eq!(command.deflections_deg, [0.0; 4]);
    assert!(manager.last_error().is_some());

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn reconfiguration_applies_to_a_running_loop() {
    let case = unique_temp_case("af_app_reconfig");
    let mut manager = FinControlManager::new(&case).unwrap();

    manager.start().unwrap();
    std::thread::sleep(Duration::from_millis(40));
    assert!(manager.status().current_command.is_none());

    // Enable mid-run; the loop reads config fresh each cycle.
    manager
        .update_config(json!({
            "enabled": true,
            "update_rate_hz": 200,
            "algorithm_source": CONSTANT_SCRIPT,
        }))
        .unwrap();
    std::thread::sleep(Duration::from_millis(150));
    manager.stop();

    assert!(manager.status().current_command.is_some());

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn invalid_configuration_is_rejected_eagerly() {
    let case = unique_temp_case("af_app_badconfig");
    let manager = FinControlManager::new(&case).unwrap();

    assert!(manager.update_config(json!({ "deflection_limit_deg": -5.0 })).is_err());
    assert!(manager.update_config(json!({ "update_rate_hz": 0 })).is_err());
    // The active config is untouched by a rejected update.
    assert_eq!(manager.config().deflection_limit_deg, 15.0);

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn test_evaluate_does_not_disturb_the_loop() {
    let case = unique_temp_case("af_app_testeval");
    let manager = FinControlManager::new(&case).unwrap();

    manager
        .update_config(json!({ "algorithm_source": CONSTANT_SCRIPT }))
        .unwrap();

    let raw = manager.test_evaluate(&CfdState::default(), &TargetTrajectory::default());
    // test_evaluate returns the raw, unclamped script output.
    assert_eq!(raw, [20.0, -20.0, 5.0, 0.0]);
    assert!(!manager.status().running);
    assert!(manager.status().current_command.is_none());

    let _ = std::fs::remove_dir_all(&case);
}
