//! Actuation against a real case directory tree.

use af_controls::ActuatorCommand;
use af_core::CaseLayout;
use af_geometry::{SurfaceActuator, default_specs, load_bindings, stl};
use std::path::PathBuf;

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
    dir
}

#[test]
fn actuation_writes_one_artifact_per_surface() {
    let case = unique_temp_case("af_geom_actuate");
    let layout = CaseLayout::new(&case);
    let bindings = load_bindings(&default_specs()).unwrap();
    let actuator = SurfaceActuator::new(layout.clone());

    let command = ActuatorCommand::clamped(0.5, [5.0, -3.0, 5.0, -3.0], 15.0);
    assert!(actuator.actuate(&command, &bindings));

    for id in ["fin1", "fin2", "fin3", "fin4"] {
        let artifact = layout.surface_geometry(id);
        assert!(artifact.exists(), "missing artifact for {id}");
        let mesh = stl::load_ascii_stl(&artifact).unwrap();
        // Triangle soup: 12 faces, 3 vertices each
        assert_eq!(mesh.faces.len(), 12);
        assert_eq!(mesh.vertices.len(), 36);
    }

    // The staged deflection record reflects the same commands.
    let staged = std::fs::read_to_string(layout.staged_deflections()).unwrap();
    let record: serde_json::Value = serde_json::from_str(&staged).unwrap();
    assert_eq!(record["deflections_deg"]["fin1"], 5.0);
    assert_eq!(record["deflections_deg"]["fin2"], -3.0);

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn artifacts_are_overwritten_not_accumulated() {
    let case = unique_temp_case("af_geom_overwrite");
    let layout = CaseLayout::new(&case);
    let bindings = load_bindings(&default_specs()).unwrap();
    let actuator = SurfaceActuator::new(layout.clone());

    assert!(actuator.actuate(&ActuatorCommand::clamped(0.1, [10.0; 4], 15.0), &bindings));
    let first = std::fs::read_to_string(layout.surface_geometry("fin1")).unwrap();

    assert!(actuator.actuate(&ActuatorCommand::clamped(0.2, [0.0; 4], 15.0), &bindings));
    let second = std::fs::read_to_string(layout.surface_geometry("fin1")).unwrap();

    // Same artifact path, different content, one file
    assert_ne!(first, second);
    let entries = std::fs::read_dir(layout.surface_dir()).unwrap().count();
    assert_eq!(entries, 4);

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn missing_bindings_fail_the_cycle_without_panic() {
    let case = unique_temp_case("af_geom_missing");
    let layout = CaseLayout::new(&case);
    let actuator = SurfaceActuator::new(layout);

    let mut bindings = load_bindings(&default_specs()).unwrap();
    bindings.truncate(2);

    let command = ActuatorCommand::neutral(0.0);
    assert!(!actuator.actuate(&command, &bindings));

    let _ = std::fs::remove_dir_all(&case);
}

#[test]
fn deflected_artifact_differs_from_neutral() {
    let case = unique_temp_case("af_geom_deflect");
    let layout = CaseLayout::new(&case);
    let bindings = load_bindings(&default_specs()).unwrap();
    let actuator = SurfaceActuator::new(layout.clone());

    assert!(actuator.actuate(&ActuatorCommand::neutral(0.0), &bindings));
    let neutral = stl::load_ascii_stl(&layout.surface_geometry("fin1")).unwrap();

    assert!(actuator.actuate(&ActuatorCommand::clamped(0.1, [15.0; 4], 15.0), &bindings));
    let deflected = stl::load_ascii_stl(&layout.surface_geometry("fin1")).unwrap();

    let moved = neutral
        .vertices
        .iter()
        .zip(&deflected.vertices)
        .any(|(a, b)| (a - b).norm() > 1e-9);
    assert!(moved, "15 degree deflection should move vertices");

    let _ = std::fs::remove_dir_all(&case);
}
