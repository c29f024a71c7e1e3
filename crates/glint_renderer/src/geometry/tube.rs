//! Infinite tube primitive: every point at `radius` from an axis line.

use super::{quadratic_roots, GeoPoint, Geometry, GeometryError, GeometryResult, Intersectable};
use crate::{Color, Material, Surface};
use glint_math::{is_zero, Interval, Ray, Vec3};

/// An infinite tube around an axis ray.
#[derive(Debug, Clone)]
pub struct Tube {
    axis: Ray,
    radius: f32,
    surface: Surface,
}

impl Tube {
    /// Create a new tube. The radius must be strictly positive.
    pub fn new(axis: Ray, radius: f32) -> GeometryResult<Self> {
        if radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }

        Ok(Self {
            axis,
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

    pub fn axis(&self) -> &Ray {
        &self.axis
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Signed distance of the projection of `point` onto the axis, measured
    /// from the axis head.
    pub(crate) fn axial_distance(&self, point: Vec3) -> f32 {
        self.axis.direction().dot(point - self.axis.origin())
    }

    /// Ray parameters where `ray` meets the lateral surface, in increasing order.
    ///
    /// Only the components perpendicular to the axis matter:
    /// |d⊥·t + Δp⊥|² = r².
    pub(crate) fn lateral_distances(&self, ray: &Ray, range: Interval) -> Vec<f32> {
        let va = self.axis.direction();
        let d = ray.direction();
        let dp = ray.origin() - self.axis.origin();

        let d_perp = d - va * d.dot(va);
        let dp_perp = dp - va * dp.dot(va);

        let a = d_perp.length_squared();
        if is_zero(a) {
            // Parallel to the axis: either always on the surface or never
            return Vec::new();
        }

        let b = 2.0 * d_perp.dot(dp_perp);
        let c = dp_perp.length_squared() - self.radius * self.radius;
        quadratic_roots(a, b, c, range)
    }
}

impl Intersectable for Tube {
    fn find_intersections<'a>(&'a self, ray: &Ray, max_distance: f32) -> Option<Vec<GeoPoint<'a>>> {
        let roots = self.lateral_distances(ray, Interval::ray_hits(max_distance));
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

impl Geometry for Tube {
    /// Points on the axis have no defined normal; they get `Vec3::ZERO`,
    /// which shades as unlit instead of aborting the render.
    fn normal(&self, point: Vec3) -> Vec3 {
        let on_axis = self.axis.at(self.axial_distance(point));
        match (point - on_axis).try_normalize() {
            Some(normal) => normal,
            None => {
                log::warn!("Tube normal requested on the axis at {:?}", point);
                Vec3::ZERO
            }
        }
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::VectorExt;

    /// Unit tube along the Z axis.
    fn z_tube() -> Tube {
        Tube::new(Ray::new(Vec3::ZERO, Vec3::Z).unwrap(), 1.0).unwrap()
    }

    #[test]
    fn test_tube_normal() {
        let tube = z_tube();
        assert!(tube.normal(Vec3::new(1.0, 0.0, 5.0)).approx_eq(Vec3::X));
        assert!(tube.normal(Vec3::new(0.0, -1.0, -3.0)).approx_eq(-Vec3::Y));
    }

    #[test]
    fn test_tube_normal_on_axis_is_zero() {
        let tube = z_tube();
        assert_eq!(tube.normal(Vec3::new(0.0, 0.0, 2.0)), Vec3::ZERO);
    }

    #[test]
    fn test_tube_rejects_non_positive_radius() {
        let axis = Ray::new(Vec3::ZERO, Vec3::Z).unwrap();
        assert!(Tube::new(axis, 0.0).is_err());
    }

    #[test]
    fn test_tube_crossing_ray() {
        let tube = z_tube();
        let ray = Ray::new(Vec3::new(-3.0, 0.0, 1.0), Vec3::X).unwrap();

        let hits = tube.find_all(&ray).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].point.approx_eq(Vec3::new(-1.0, 0.0, 1.0)));
        assert!(hits[1].point.approx_eq(Vec3::new(1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_tube_oblique_ray() {
        let tube = z_tube();
        let ray = Ray::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0)).unwrap();

        let hits = tube.find_all(&ray).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].point.approx_eq(Vec3::new(-1.0, 0.0, 2.0)));
        assert!(hits[1].point.approx_eq(Vec3::new(1.0, 0.0, 4.0)));
    }

    #[test]
    fn test_tube_parallel_and_tangent_rays() {
        let tube = z_tube();

        let parallel = Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::Z).unwrap();
        assert!(tube.find_all(&parallel).is_none());

        let tangent = Ray::new(Vec3::new(-3.0, 1.0, 0.0), Vec3::X).unwrap();
        assert!(tube.find_all(&tangent).is_none());
    }

    #[test]
    fn test_tube_from_inside() {
        let tube = z_tube();
        let ray = Ray::new(Vec3::ZERO, Vec3::Y).unwrap();

        let hits = tube.find_all(&ray).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].point.approx_eq(Vec3::Y));
    }
}
