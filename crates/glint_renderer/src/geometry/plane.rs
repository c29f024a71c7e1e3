//! Infinite plane primitive.

use super::{plane_distance, GeoPoint, Geometry, GeometryError, GeometryResult, Intersectable};
use crate::{Color, Material, Surface};
use glint_math::{Interval, Ray, Vec3, VectorExt};

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone)]
pub struct Plane {
    point: Vec3,
    normal: Vec3,
    surface: Surface,
}

impl Plane {
    /// Create a plane from a point and a (not necessarily unit) normal.
    pub fn new(point: Vec3, normal: Vec3) -> GeometryResult<Self> {
        Ok(Self {
            point,
            normal: normal.unit()?,
            surface: Surface::default(),
        })
    }

    /// Create a plane through three points.
    ///
    /// The normal follows the right-hand rule on `(p2 - p1) x (p3 - p1)`, so
    /// (0,0,0), (1,0,0), (0,1,0) gives +Z.
    pub fn from_points(p1: Vec3, p2: Vec3, p3: Vec3) -> GeometryResult<Self> {
        let normal = (p2 - p1)
            .cross(p3 - p1)
            .unit()
            .map_err(|_| GeometryError::CollinearPoints)?;

        Ok(Self {
            point: p1,
            normal,
            surface: Surface::default(),
        })
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.surface.material = material;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.surface.emission = emission;
        self
    }

    /// The reference point the plane was built from.
    pub fn point(&self) -> Vec3 {
        self.point
    }

    /// The unit normal, independent of any query point.
    pub fn unit_normal(&self) -> Vec3 {
        self.normal
    }
}

impl Intersectable for Plane {
    fn find_intersections<'a>(&'a self, ray: &Ray, max_distance: f32) -> Option<Vec<GeoPoint<'a>>> {
        let t = plane_distance(self.point, self.normal, ray, Interval::ray_hits(max_distance))?;
        Some(vec![GeoPoint::new(self, ray.at(t))])
    }
}

impl Geometry for Plane {
    fn normal(&self, _point: Vec3) -> Vec3 {
        self.normal
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::MathError;

    #[test]
    fn test_plane_from_points_normal() {
        let plane = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::Y).unwrap();
        assert!(plane.unit_normal().approx_eq(Vec3::Z));
        assert!(plane.normal(Vec3::new(5.0, 5.0, 0.0)).approx_eq(Vec3::Z));
    }

    #[test]
    fn test_plane_rejects_collinear_points() {
        let err = Plane::from_points(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, GeometryError::CollinearPoints);

        let err = Plane::from_points(Vec3::ONE, Vec3::ONE, Vec3::Y).unwrap_err();
        assert_eq!(err, GeometryError::CollinearPoints);
    }

    #[test]
    fn test_plane_rejects_zero_normal() {
        let err = Plane::new(Vec3::ZERO, Vec3::ZERO).unwrap_err();
        assert_eq!(err, GeometryError::Math(MathError::ZeroVector));
    }

    #[test]
    fn test_plane_hit() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, -1.0)).unwrap();

        let hits = plane.find_all(&ray).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].point.approx_eq(Vec3::new(2.0, 0.0, -2.0)));
    }

    #[test]
    fn test_plane_parallel_and_behind() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z).unwrap();

        let parallel = Ray::new(Vec3::ZERO, Vec3::X).unwrap();
        assert!(plane.find_all(&parallel).is_none());

        let away = Ray::new(Vec3::ZERO, Vec3::Z).unwrap();
        assert!(plane.find_all(&away).is_none());

        // Starting on the plane
        let on = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::new(0.0, 1.0, -1.0)).unwrap();
        assert!(plane.find_all(&on).is_none());
    }

    #[test]
    fn test_plane_max_distance() {
        let plane = Plane::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z).unwrap();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z).unwrap();

        assert!(plane.find_intersections(&ray, 1.0).is_none());
        assert!(plane.find_intersections(&ray, 2.0).is_some());
    }
}
