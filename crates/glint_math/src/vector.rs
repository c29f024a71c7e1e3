//! Tolerance helpers layered on top of glam's `Vec3`.
//!
//! glam gives us the value type (add, subtract, scale, dot, cross). What it
//! does not give us is a normalization that refuses zero-length input, or a
//! shared notion of "close enough to zero" for the intersection solvers.

use crate::{MathError, MathResult, Vec3};

/// Tolerance used for every "is this zero" decision in Glint.
pub const EPSILON: f32 = 1e-5;

/// Returns true if `x` is within [`EPSILON`] of zero.
#[inline]
pub fn is_zero(x: f32) -> bool {
    x.abs() < EPSILON
}

/// Snap values within [`EPSILON`] of zero to exactly zero.
#[inline]
pub fn align_zero(x: f32) -> f32 {
    if is_zero(x) {
        0.0
    } else {
        x
    }
}

/// Vector helpers that carry Glint's validation rules.
pub trait VectorExt: Sized {
    /// Normalize, rejecting zero-length vectors.
    fn unit(self) -> MathResult<Self>;

    /// Component-wise equality within [`EPSILON`].
    fn approx_eq(self, other: Self) -> bool;

    /// True if every component is strictly below `threshold`.
    fn all_below(self, threshold: f32) -> bool;

    /// True if the dot product with `other` is zero within tolerance.
    fn is_orthogonal_to(self, other: Self) -> bool;
}

impl VectorExt for Vec3 {
    #[inline]
    fn unit(self) -> MathResult<Self> {
        self.try_normalize().ok_or(MathError::ZeroVector)
    }

    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        self.abs_diff_eq(other, EPSILON)
    }

    #[inline]
    fn all_below(self, threshold: f32) -> bool {
        self.cmplt(Vec3::splat(threshold)).all()
    }

    #[inline]
    fn is_orthogonal_to(self, other: Self) -> bool {
        is_zero(self.dot(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_rejects_zero() {
        assert_eq!(Vec3::ZERO.unit(), Err(MathError::ZeroVector));
    }

    #[test]
    fn test_unit_length() {
        let v = Vec3::new(1.0, 2.0, 2.0).unit().unwrap();
        assert!((v.length() - 1.0).abs() < EPSILON);
        assert!(v.approx_eq(Vec3::new(1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0)));
    }

    #[test]
    fn test_align_zero() {
        assert_eq!(align_zero(1e-7), 0.0);
        assert_eq!(align_zero(-1e-7), 0.0);
        assert_eq!(align_zero(0.5), 0.5);
    }

    #[test]
    fn test_all_below() {
        assert!(Vec3::splat(0.0005).all_below(0.001));
        assert!(!Vec3::new(0.0005, 0.5, 0.0).all_below(0.001));
    }

    #[test]
    fn test_orthogonal() {
        assert!(Vec3::X.is_orthogonal_to(Vec3::Y));
        assert!(!Vec3::X.is_orthogonal_to(Vec3::new(1.0, 1.0, 0.0)));
    }
}
