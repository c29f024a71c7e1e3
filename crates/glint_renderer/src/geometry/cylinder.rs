//! Finite capped cylinder, built on top of a [`Tube`].

use super::{plane_distance, GeoPoint, Geometry, GeometryError, GeometryResult, Intersectable, Tube};
use crate::{Color, Material, Surface};
use glint_math::{is_zero, Interval, Ray, Vec3};

/// A tube cut to `height` along its axis and closed by two disks.
///
/// The bottom cap is centered on the axis head, the top cap at
/// `head + height * axis direction`.
#[derive(Debug, Clone)]
pub struct Cylinder {
    tube: Tube,
    height: f32,
}

impl Cylinder {
    /// Create a new cylinder. Radius and height must be strictly positive.
    pub fn new(axis: Ray, radius: f32, height: f32) -> GeometryResult<Self> {
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveHeight(height));
        }

        Ok(Self {
            tube: Tube::new(axis, radius)?,
            height,
        })
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.tube = self.tube.with_material(material);
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.tube = self.tube.with_emission(emission);
        self
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn radius(&self) -> f32 {
        self.tube.radius()
    }

    fn bottom(&self) -> Vec3 {
        self.tube.axis().origin()
    }

    fn top(&self) -> Vec3 {
        self.tube.axis().at(self.height)
    }

    /// Ray parameter of a hit on the cap centered at `center`, if the hit
    /// falls strictly inside the disk.
    fn cap_distance(&self, center: Vec3, ray: &Ray, range: Interval) -> Option<f32> {
        let t = plane_distance(center, self.tube.axis().direction(), ray, range)?;
        let radius = self.tube.radius();
        (ray.at(t).distance_squared(center) < radius * radius).then_some(t)
    }
}

impl Intersectable for Cylinder {
    fn find_intersections<'a>(&'a self, ray: &Ray, max_distance: f32) -> Option<Vec<GeoPoint<'a>>> {
        let range = Interval::ray_hits(max_distance);
        let span = Interval::new(0.0, self.height);

        let mut distances: Vec<f32> = self
            .tube
            .lateral_distances(ray, range)
            .into_iter()
            .filter(|t| span.surrounds(self.tube.axial_distance(ray.at(*t))))
            .collect();
        distances.extend(self.cap_distance(self.bottom(), ray, range));
        distances.extend(self.cap_distance(self.top(), ray, range));

        if distances.is_empty() {
            return None;
        }

        distances.sort_by(f32::total_cmp);
        Some(
            distances
                .into_iter()
                .map(|t| GeoPoint::new(self, ray.at(t)))
                .collect(),
        )
    }
}

impl Geometry for Cylinder {
    fn normal(&self, point: Vec3) -> Vec3 {
        let axial = self.tube.axial_distance(point);
        let direction = self.tube.axis().direction();

        if is_zero(axial) {
            -direction
        } else if is_zero(axial - self.height) {
            direction
        } else {
            self.tube.normal(point)
        }
    }

    fn surface(&self) -> &Surface {
        self.tube.surface()
    }
}
