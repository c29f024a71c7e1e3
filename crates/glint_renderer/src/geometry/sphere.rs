//! Sphere primitive for ray tracing.

use super::{quadratic_roots, GeoPoint, Geometry, GeometryError, GeometryResult, Intersectable};
use crate::{Color, Material, Surface};
use glint_math::{Interval, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    surface: Surface,
}

impl Sphere {
    /// Create a new sphere. The radius must be strictly positive.
    pub fn new(center: Vec3, radius: f32) -> GeometryResult<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }

        Ok(Self {
            center,
            radius,
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

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Intersectable for Sphere {
    fn find_intersections<'a>(&'a self, ray: &Ray, max_distance: f32) -> Option<Vec<GeoPoint<'a>>> {
        // |o + t·d - c|² = r² with |d| = 1:
        // t² - 2t·(d·oc) + |oc|² - r² = 0, where oc = c - o
        let oc = self.center - ray.origin();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let roots = quadratic_roots(1.0, -2.0 * h, c, Interval::ray_hits(max_distance));
        if roots.is_empty() {
            return None;
        }

        Some(
            roots
                .into_iter()
                .map(|t| GeoPoint::new(self, ray.at(t)))
                .collect(),
        )
    }
}

impl Geometry for Sphere {
    fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize_or_zero()
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::VectorExt;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0).unwrap()
    }

    #[test]
    fn test_sphere_rejects_non_positive_radius() {
        assert_eq!(
            Sphere::new(Vec3::ZERO, 0.0).unwrap_err(),
            GeometryError::NonPositiveRadius(0.0)
        );
        assert!(Sphere::new(Vec3::ZERO, -1.0).is_err());
    }

    #[test]
    fn test_sphere_normal() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, 1.0), 1.0).unwrap();
        assert!(sphere.normal(Vec3::new(0.0, 0.0, 2.0)).approx_eq(Vec3::Z));
    }

    #[test]
    fn test_sphere_through_center() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::X).unwrap();

        let hits = sphere.find_all(&ray).expect("ray through center must hit");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].point.approx_eq(Vec3::new(-1.0, 0.0, 0.0)));
        assert!(hits[1].point.approx_eq(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(-2.0, 2.0, 0.0), Vec3::X).unwrap();
        assert!(sphere.find_all(&ray).is_none());

        // Pointing away from the sphere
        let away = Ray::new(Vec3::new(-2.0, 0.0, 0.0), -Vec3::X).unwrap();
        assert!(sphere.find_all(&away).is_none());
    }

    #[test]
    fn test_sphere_tangent_is_miss() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(-2.0, 1.0, 0.0), Vec3::X).unwrap();
        assert!(sphere.find_all(&ray).is_none());
    }

    #[test]
    fn test_sphere_ray_from_inside() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::X).unwrap();

        let hits = sphere.find_all(&ray).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].point.approx_eq(Vec3::X));
    }

    #[test]
    fn test_sphere_head_on_surface_not_reported() {
        let sphere = unit_sphere();

        // Leaving the surface outwards
        let out = Ray::new(Vec3::X, Vec3::X).unwrap();
        assert!(sphere.find_all(&out).is_none());

        // Entering from the surface
        let through = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X).unwrap();
        let hits = sphere.find_all(&through).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].point.approx_eq(Vec3::X));
    }

    #[test]
    fn test_sphere_max_distance() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::X).unwrap();

        let near_only = sphere.find_intersections(&ray, 2.0).unwrap();
        assert_eq!(near_only.len(), 1);
        assert!(near_only[0].point.approx_eq(Vec3::new(-1.0, 0.0, 0.0)));

        assert!(sphere.find_intersections(&ray, 0.5).is_none());
    }

    #[test]
    fn test_sphere_closest() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::X).unwrap();
        let closest = sphere.find_closest(&ray, f32::INFINITY).unwrap();
        assert!(closest.point.approx_eq(Vec3::new(-1.0, 0.0, 0.0)));
    }
}
