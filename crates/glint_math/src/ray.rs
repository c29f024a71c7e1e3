use crate::{is_zero, MathResult, Vec3, VectorExt};

/// Distance secondary rays are pushed off a surface along its normal.
pub const DELTA: f32 = 1e-3;

/// A ray in 3D space: a head point and a unit direction.
///
/// The direction is normalized on construction, so `at(t)` measures `t` in
/// world units from the head.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Create a new ray. Fails if `direction` has zero length.
    pub fn new(origin: Vec3, direction: Vec3) -> MathResult<Self> {
        Ok(Self {
            origin,
            direction: direction.unit()?,
        })
    }

    /// Create a ray whose head is moved [`DELTA`] off a surface.
    ///
    /// The head moves along `normal` towards the side `direction` points to,
    /// so the new ray cannot re-hit the surface it starts on.
    pub fn offset(point: Vec3, direction: Vec3, normal: Vec3) -> MathResult<Self> {
        let direction = direction.unit()?;
        let nv = normal.dot(direction);
        let origin = if is_zero(nv) {
            point
        } else {
            point + normal * DELTA.copysign(nv)
        };
        Ok(Self { origin, direction })
    }

    /// Get the head point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the unit direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        if is_zero(t) {
            self.origin
        } else {
            self.origin + self.direction * t
        }
    }
}
