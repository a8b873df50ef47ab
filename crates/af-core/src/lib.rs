//! af-core: stable foundation for aerofin.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - case (solver case directory layout)
//! - error (shared error types)

pub mod case;
pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use case::CaseLayout;
pub use error::{AfError, AfResult};
pub use numeric::*;
