//! Intersectable geometry: the primitives and the composite aggregator.
//!
//! Every solver follows one convention: a ray that meets nothing inside
//! `(0, max_distance]` yields `None`, never an empty vector.

mod cylinder;
mod geometries;
mod plane;
mod polygon;
mod sphere;
mod tube;

pub use cylinder::Cylinder;
pub use geometries::Geometries;
pub use plane::Plane;
pub use polygon::Polygon;
pub use sphere::Sphere;
pub use tube::Tube;

use std::fmt;

use crate::{Color, Material, Surface};
use glint_math::{align_zero, is_zero, Interval, MathError, Ray, Vec3};
use thiserror::Error;

/// Errors raised while constructing geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    #[error("points are collinear or coincident and do not define a plane")]
    CollinearPoints,

    #[error("vertices {0} and {1} coincide")]
    CoincidentVertices(usize, usize),

    #[error("vertex {0} does not lie in the polygon plane")]
    NonCoplanar(usize),

    #[error("polygon is not convex or its vertices are misordered at vertex {0}")]
    NonConvex(usize),

    #[error("radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("height must be positive, got {0}")]
    NonPositiveHeight(f32),

    #[error(transparent)]
    Math(#[from] MathError),
}

pub type GeometryResult<T> = Result<T, GeometryError>;

/// Record of a ray-geometry intersection.
#[derive(Clone, Copy)]
pub struct GeoPoint<'a> {
    /// The geometry that was hit
    pub geometry: &'a dyn Geometry,
    /// Point of intersection
    pub point: Vec3,
}

impl<'a> GeoPoint<'a> {
    pub fn new(geometry: &'a dyn Geometry, point: Vec3) -> Self {
        Self { geometry, point }
    }

    /// Surface normal of the hit geometry at the hit point.
    pub fn normal(&self) -> Vec3 {
        self.geometry.normal(self.point)
    }

    pub fn material(&self) -> &'a Material {
        &self.geometry.surface().material
    }

    pub fn emission(&self) -> Color {
        self.geometry.surface().emission
    }
}

impl PartialEq for GeoPoint<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(self.geometry, other.geometry) && self.point == other.point
    }
}

impl fmt::Debug for GeoPoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoPoint")
            .field("geometry", &format_args!("{:p}", self.geometry))
            .field("point", &self.point)
            .finish()
    }
}

/// Anything a ray can be intersected with.
pub trait Intersectable: Send + Sync {
    /// All intersections of `ray` with this object at distances in
    /// `(0, max_distance]`, or `None` if there are none.
    fn find_intersections<'a>(&'a self, ray: &Ray, max_distance: f32) -> Option<Vec<GeoPoint<'a>>>;

    /// All intersections at any distance along the ray.
    fn find_all<'a>(&'a self, ray: &Ray) -> Option<Vec<GeoPoint<'a>>> {
        self.find_intersections(ray, f32::INFINITY)
    }

    /// The intersection nearest to the ray head.
    fn find_closest<'a>(&'a self, ray: &Ray, max_distance: f32) -> Option<GeoPoint<'a>> {
        let origin = ray.origin();
        self.find_intersections(ray, max_distance)?
            .into_iter()
            .min_by(|a, b| {
                a.point
                    .distance_squared(origin)
                    .total_cmp(&b.point.distance_squared(origin))
            })
    }
}

/// A single shaded primitive.
pub trait Geometry: Intersectable {
    /// Outward surface normal at `point`, which is assumed to lie on the surface.
    fn normal(&self, point: Vec3) -> Vec3;

    /// Emission and material used by the shading engine.
    fn surface(&self) -> &Surface;
}

/// Distance along `ray` to the plane through `point` with unit `normal`,
/// if it falls inside `range`.
///
/// Rays parallel to the plane and rays starting on it do not intersect.
pub(crate) fn plane_distance(point: Vec3, normal: Vec3, ray: &Ray, range: Interval) -> Option<f32> {
    let nv = normal.dot(ray.direction());
    if is_zero(nv) {
        return None;
    }

    let to_plane = point - ray.origin();
    let t = align_zero(normal.dot(to_plane) / nv);
    range.admits(t).then_some(t)
}

/// Roots of `a·t² + b·t + c = 0` inside `range`, in increasing order.
///
/// A (near) zero discriminant is a tangent and counts as no roots.
pub(crate) fn quadratic_roots(a: f32, b: f32, c: f32, range: Interval) -> Vec<f32> {
    let discriminant = align_zero(b * b - 4.0 * a * c);
    if discriminant <= 0.0 {
        return Vec::new();
    }

    let sqrtd = discriminant.sqrt();
    let t1 = align_zero((-b - sqrtd) / (2.0 * a));
    let t2 = align_zero((-b + sqrtd) / (2.0 * a));
    let (near, far) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };

    [near, far].into_iter().filter(|t| range.admits(*t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_roots_ordered() {
        // (t - 1)(t - 3) = t² - 4t + 3
        let roots = quadratic_roots(1.0, -4.0, 3.0, Interval::ray_hits(f32::INFINITY));
        assert_eq!(roots, vec![1.0, 3.0]);
    }

    #[test]
    fn test_quadratic_tangent_is_empty() {
        // (t - 2)² = t² - 4t + 4
        let roots = quadratic_roots(1.0, -4.0, 4.0, Interval::ray_hits(f32::INFINITY));
        assert!(roots.is_empty());
    }

    #[test]
    fn test_quadratic_range_filter() {
        let roots = quadratic_roots(1.0, -4.0, 3.0, Interval::ray_hits(2.0));
        assert_eq!(roots, vec![1.0]);
    }

    #[test]
    fn test_plane_distance_parallel() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X).unwrap();
        assert!(plane_distance(Vec3::ZERO, Vec3::Z, &ray, Interval::ray_hits(f32::INFINITY)).is_none());
    }

    #[test]
    fn test_geo_point_identity() {
        let a = Sphere::new(Vec3::ZERO, 1.0).unwrap();
        let b = Sphere::new(Vec3::ZERO, 1.0).unwrap();

        let p = Vec3::X;
        assert_eq!(GeoPoint::new(&a, p), GeoPoint::new(&a, p));
        assert_ne!(GeoPoint::new(&a, p), GeoPoint::new(&b, p));
        assert_ne!(GeoPoint::new(&a, p), GeoPoint::new(&a, Vec3::Y));
    }
}
