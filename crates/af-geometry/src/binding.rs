//! Static per-surface bindings.
//!
//! A binding fixes how one controllable surface rotates: its pivot point,
//! its rotation axis, and the base geometry that every cycle's rotation
//! starts from. Bindings are loaded once at setup and read-only while the
//! loop runs.

use crate::error::GeometryResult;
use crate::mesh::TriMesh;
use crate::planform::FinPlanform;
use crate::stl;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Loadable description of one surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub id: String,
    pub pivot_m: [f64; 3],
    pub axis: [f64; 3],
    /// Base geometry on disk. When absent or unreadable the planform
    /// fallback is generated instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stl_path: Option<PathBuf>,
    #[serde(default = "FinPlanform::default_fin")]
    pub planform: FinPlanform,
}

/// One surface's resolved rotation binding.
#[derive(Debug, Clone)]
pub struct SurfaceBinding {
    pub id: String,
    pub pivot_m: Vector3<f64>,
    pub axis: Vector3<f64>,
    /// Never mutated by actuation; every cycle rotates a fresh copy.
    pub base: TriMesh,
}

impl SurfaceBinding {
    /// Resolve a spec, falling back to generated planform geometry when
    /// the referenced STL is missing or unreadable.
    pub fn from_spec(spec: &SurfaceSpec) -> Self {
        let base = match &spec.stl_path {
            Some(path) => match stl::load_ascii_stl(path) {
                Ok(mesh) => mesh,
                Err(err) => {
                    warn!(
                        surface = %spec.id,
                        path = %path.display(),
                        %err,
                        "base geometry unreadable, generating planform fallback"
                    );
                    spec.planform.generate()
                }
            },
            None => spec.planform.generate(),
        };

        Self {
            id: spec.id.clone(),
            pivot_m: Vector3::from(spec.pivot_m),
            axis: Vector3::from(spec.axis),
            base,
        }
    }
}

/// Resolve a full set of specs into bindings.
pub fn load_bindings(specs: &[SurfaceSpec]) -> GeometryResult<Vec<SurfaceBinding>> {
    Ok(specs.iter().map(SurfaceBinding::from_spec).collect())
}

/// The reference 4-fin cruciform layout: fins 1/3 on the vertical plane
/// rotating about x (pitch authority), fins 2/4 on the horizontal plane
/// rotating about y (yaw authority).
pub fn default_specs() -> Vec<SurfaceSpec> {
    let fin = |id: &str, pivot: [f64; 3], axis: [f64; 3]| SurfaceSpec {
        id: id.to_string(),
        pivot_m: pivot,
        axis,
        stl_path: None,
        planform: FinPlanform::default_fin(),
    };
    vec![
        fin("fin1", [0.0, 0.1, 0.0], [1.0, 0.0, 0.0]),
        fin("fin2", [0.1, 0.0, 0.0], [0.0, 1.0, 0.0]),
        fin("fin3", [0.0, -0.1, 0.0], [1.0, 0.0, 0.0]),
        fin("fin4", [-0.1, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ]
}
