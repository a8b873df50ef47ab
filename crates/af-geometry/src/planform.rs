//! Fin planform generation.
//!
//! Generates watertight prism meshes for the common fin shapes, used as
//! the fallback base geometry when a surface has no STL on disk. All
//! dimensions are meters; the fin lies in the x-y plane with thickness
//! along z, root edge at y = 0.

use crate::mesh::TriMesh;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Fin outline extruded to a thin prism.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FinPlanform {
    Rectangular {
        span_m: f64,
        chord_m: f64,
        thickness_m: f64,
        #[serde(default)]
        sweep_m: f64,
    },
    Trapezoidal {
        span_m: f64,
        root_chord_m: f64,
        tip_chord_m: f64,
        thickness_m: f64,
        #[serde(default)]
        sweep_m: f64,
    },
}

impl FinPlanform {
    /// Default fallback fin: 25 mm span, 15 mm chord, 2 mm thick.
    pub fn default_fin() -> Self {
        Self::Rectangular {
            span_m: 0.025,
            chord_m: 0.015,
            thickness_m: 0.002,
            sweep_m: 0.0,
        }
    }

    /// Generate the prism mesh: four outline corners at z = 0, the same
    /// four at z = thickness, twelve triangles.
    pub fn generate(&self) -> TriMesh {
        let (outline, thickness) = match *self {
            Self::Rectangular {
                span_m,
                chord_m,
                thickness_m,
                sweep_m,
            } => (
                [
                    [0.0, 0.0],
                    [chord_m, 0.0],
                    [chord_m + sweep_m, span_m],
                    [sweep_m, span_m],
                ],
                thickness_m,
            ),
            Self::Trapezoidal {
                span_m,
                root_chord_m,
                tip_chord_m,
                thickness_m,
                sweep_m,
            } => (
                [
                    [0.0, 0.0],
                    [root_chord_m, 0.0],
                    [sweep_m + tip_chord_m, span_m],
                    [sweep_m, span_m],
                ],
                thickness_m,
            ),
        };

        let mut vertices = Vec::with_capacity(8);
        for z in [0.0, thickness] {
            for [x, y] in outline {
                vertices.push(Vector3::new(x, y, z));
            }
        }

        let faces = vec![
            // bottom
            [0, 1, 2],
            [0, 2, 3],
            // top
            [4, 6, 5],
            [4, 7, 6],
            // sides
            [0, 4, 5],
            [0, 5, 1],
            [1, 5, 6],
            [1, 6, 2],
            [2, 6, 7],
            [2, 7, 3],
            [3, 7, 4],
            [3, 4, 0],
        ];

        TriMesh { vertices, faces }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangular_prism_shape() {
        let mesh = FinPlanform::Rectangular {
            span_m: 0.025,
            chord_m: 0.015,
            thickness_m: 0.002,
            sweep_m: 0.0,
        }
        .generate();

        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.faces.len(), 12);

        let max_y = mesh.vertices.iter().map(|v| v.y).fold(f64::MIN, f64::max);
        let max_z = mesh.vertices.iter().map(|v| v.z).fold(f64::MIN, f64::max);
        assert_eq!(max_y, 0.025);
        assert_eq!(max_z, 0.002);
    }

    #[test]
    fn sweep_shifts_the_tip() {
        let mesh = FinPlanform::Rectangular {
            span_m: 0.025,
            chord_m: 0.015,
            thickness_m: 0.002,
            sweep_m: 0.005,
        }
        .generate();
        // Tip leading edge sits at x = sweep
        assert_eq!(mesh.vertices[3].x, 0.005);
        assert_eq!(mesh.vertices[3].y, 0.025);
    }

    #[test]
    fn trapezoid_narrows_at_the_tip() {
        let mesh = FinPlanform::Trapezoidal {
            span_m: 0.025,
            root_chord_m: 0.015,
            tip_chord_m: 0.008,
            thickness_m: 0.002,
            sweep_m: 0.005,
        }
        .generate();
        let tip_chord = mesh.vertices[2].x - mesh.vertices[3].x;
        assert!((tip_chord - 0.008).abs() < 1e-12);
    }
}
