//! Glint math - linear algebra for the ray tracer.
//!
//! Points, vectors and colors are all glam `Vec3` values. This crate adds
//! the pieces glam leaves out: fallible normalization, a shared tolerance,
//! and the `Ray` type every solver works on.

// Re-export glam for convenience
pub use glam::*;

mod error;
mod interval;
mod ray;
mod vector;

pub use error::{MathError, MathResult};
pub use interval::Interval;
pub use ray::{Ray, DELTA};
pub use vector::{align_zero, is_zero, VectorExt, EPSILON};
