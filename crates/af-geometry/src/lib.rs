//! Fin surface geometry and actuation.
//!
//! Provides:
//! - triangle meshes with rotation about an arbitrary pivot/axis
//! - ASCII STL reading and writing for boundary-surface artifacts
//! - fin planform generation (rectangular, trapezoidal prisms)
//! - static per-surface bindings (pivot, axis, base geometry)
//! - the surface actuator that regenerates geometry artifacts each cycle
//!
//! Base geometry loaded into a binding is never mutated: actuation always
//! rotates a fresh copy and overwrites only the per-cycle artifact, so a
//! failed cycle leaves the previous artifact in place.

pub mod actuator;
pub mod binding;
pub mod error;
pub mod mesh;
pub mod planform;
pub mod stl;

pub use actuator::SurfaceActuator;
pub use binding::{SurfaceBinding, SurfaceSpec, default_specs, load_bindings};
pub use error::{GeometryError, GeometryResult};
pub use mesh::TriMesh;
pub use planform::FinPlanform;
