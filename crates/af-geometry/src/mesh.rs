//! Indexed triangle meshes.

use crate::error::{GeometryError, GeometryResult};
use nalgebra::{Rotation3, Unit, Vector3};

/// An indexed triangle mesh: shared vertices plus triangular faces.
#[derive(Debug, Clone, PartialEq)]
pub struct TriMesh {
    pub vertices: Vec<Vector3<f64>>,
    pub faces: Vec<[usize; 3]>,
}

impl TriMesh {
    /// Build a mesh, validating that every face index is in range.
    pub fn new(vertices: Vec<Vector3<f64>>, faces: Vec<[usize; 3]>) -> GeometryResult<Self> {
        let len = vertices.len();
        for face in &faces {
            for &idx in face {
                if idx >= len {
                    return Err(GeometryError::InvalidMesh {
                        what: format!("face index {idx} out of range (vertex count {len})"),
                    });
                }
            }
        }
        Ok(Self { vertices, faces })
    }

    /// Rotate a copy of this mesh by `angle_deg` about `axis`, centered at
    /// `pivot`: translate by `-pivot`, rotate, translate back.
    ///
    /// `self` is untouched; the returned mesh shares nothing with it.
    pub fn rotated_about(
        &self,
        axis: &Vector3<f64>,
        pivot: &Vector3<f64>,
        angle_deg: f64,
    ) -> GeometryResult<TriMesh> {
        let axis = Unit::try_new(*axis, 1e-12).ok_or(GeometryError::InvalidAxis {
            what: "rotation axis has near-zero length",
        })?;
        let rotation = Rotation3::from_axis_angle(&axis, angle_deg.to_radians());

        let vertices = self
            .vertices
            .iter()
            .map(|v| pivot + rotation * (v - pivot))
            .collect();

        Ok(TriMesh {
            vertices,
            faces: self.faces.clone(),
        })
    }

    /// Unit normal of one face, or zero for a degenerate triangle.
    pub fn facet_normal(&self, face: [usize; 3]) -> Vector3<f64> {
        let [a, b, c] = face;
        let edge1 = self.vertices[b] - self.vertices[a];
        let edge2 = self.vertices[c] - self.vertices[a];
        let normal = edge1.cross(&edge2);
        if normal.norm() > 1e-12 {
            normal.normalize()
        } else {
            Vector3::zeros()
        }
    }
}
