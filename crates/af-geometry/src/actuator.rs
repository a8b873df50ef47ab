//! Per-cycle surface actuation.

use crate::binding::SurfaceBinding;
use crate::error::GeometryResult;
use crate::stl;
use af_controls::{ActuatorCommand, SURFACE_COUNT};
use af_core::CaseLayout;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use tracing::{debug, warn};

/// Applies a clamped command to the case's geometry artifacts.
///
/// For each surface the base geometry is rotated by the commanded
/// deflection about the binding's axis, centered at its pivot, and the
/// result overwrites that surface's boundary-surface artifact. The staged
/// deflection record for the solver's moving-boundary update is rewritten
/// afterwards.
///
/// Actuation never panics and never mutates base geometry. A surface that
/// cannot be actuated keeps its previous artifact (last-good-value) and
/// the cycle is reported failed.
#[derive(Debug, Clone)]
pub struct SurfaceActuator {
    layout: CaseLayout,
}

/// Record staged beside the solver's displacement field each cycle.
#[derive(Debug, Serialize)]
struct StagedDeflections<'a> {
    timestamp_s: f64,
    deflections_deg: BTreeMap<&'a str, f64>,
}

impl SurfaceActuator {
    pub fn new(layout: CaseLayout) -> Self {
        Self { layout }
    }

    /// Apply one command. Returns whether the whole cycle succeeded.
    pub fn actuate(&self, command: &ActuatorCommand, bindings: &[SurfaceBinding]) -> bool {
        if bindings.len() < SURFACE_COUNT {
            warn!(
                bound = bindings.len(),
                required = SURFACE_COUNT,
                "surface bindings missing, skipping actuation"
            );
            return false;
        }

        let mut ok = true;
        for (binding, deflection_deg) in bindings.iter().zip(command.deflections_deg) {
            if let Err(err) = self.actuate_surface(binding, deflection_deg) {
                warn!(
                    surface = %binding.id,
                    deflection_deg,
                    %err,
                    "surface actuation failed, previous artifact kept"
                );
                ok = false;
            }
        }

        if ok && let Err(err) = self.stage_displacement(command, bindings) {
            warn!(%err, "displacement staging failed");
            ok = false;
        }
        ok
    }

    fn actuate_surface(&self, binding: &SurfaceBinding, deflection_deg: f64) -> GeometryResult<()> {
        let rotated = binding
            .base
            .rotated_about(&binding.axis, &binding.pivot_m, deflection_deg)?;
        let path = self.layout.surface_geometry(&binding.id);
        stl::write_ascii_stl(&rotated, &binding.id, &path)
    }

    /// Stage the moving-boundary update for the solver's next iteration.
    ///
    /// The solver-side `pointDisplacement` field format is out of scope;
    /// what is staged here is the per-surface deflection record the mesh
    /// motion derives from.
    fn stage_displacement(
        &self,
        command: &ActuatorCommand,
        bindings: &[SurfaceBinding],
    ) -> GeometryResult<()> {
        if self.layout.displacement_field().exists() {
            debug!(
                field = %self.layout.displacement_field().display(),
                "moving-boundary displacement field present"
            );
        }

        let record = StagedDeflections {
            timestamp_s: command.timestamp_s,
            deflections_deg: bindings
                .iter()
                .map(|b| b.id.as_str())
                .zip(command.deflections_deg)
                .collect(),
        };

        let path = self.layout.staged_deflections();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&record).map_err(std::io::Error::other)?;
        fs::write(path, json)?;
        Ok(())
    }
}
