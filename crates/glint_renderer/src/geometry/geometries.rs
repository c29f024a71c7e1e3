//! Composite aggregator treating a list of intersectables as one.

use std::sync::Arc;

use super::{GeoPoint, Intersectable};
use glint_math::Ray;

/// An ordered collection of intersectables.
///
/// Members are shared, not owned: the same primitive can sit in several
/// aggregates. No acceleration structure; every query walks the whole list.
#[derive(Clone, Default)]
pub struct Geometries {
    items: Vec<Arc<dyn Intersectable>>,
}

impl Geometries {
    /// Create a new empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the aggregate.
    pub fn add(&mut self, item: impl Intersectable + 'static) {
        self.items.push(Arc::new(item));
    }

    /// Add an object that may also be referenced elsewhere.
    pub fn add_shared(&mut self, item: Arc<dyn Intersectable>) {
        self.items.push(item);
    }

    /// Get the number of members.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the aggregate is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Arc<dyn Intersectable>> for Geometries {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Intersectable>>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Intersectable for Geometries {
    fn find_intersections<'a>(&'a self, ray: &Ray, max_distance: f32) -> Option<Vec<GeoPoint<'a>>> {
        let mut result: Option<Vec<GeoPoint<'a>>> = None;

        for item in &self.items {
            if let Some(mut points) = item.find_intersections(ray, max_distance) {
                result.get_or_insert_with(Vec::new).append(&mut points);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Plane, Polygon, Sphere};
    use glint_math::Vec3;

    #[test]
    fn test_empty_aggregate_never_intersects() {
        let empty = Geometries::new();
        assert!(empty.is_empty());

        for direction in [Vec3::X, Vec3::Y, -Vec3::Z, Vec3::ONE] {
            let ray = Ray::new(Vec3::ZERO, direction).unwrap();
            assert!(empty.find_all(&ray).is_none());
        }
    }

    #[test]
    fn test_aggregate_miss_is_none() {
        let mut geometries = Geometries::new();
        geometries.add(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0).unwrap());
        geometries.add(Plane::new(Vec3::new(0.0, -1.0, 0.0), Vec3::Y).unwrap());

        let ray = Ray::new(Vec3::ZERO, Vec3::Y).unwrap();
        assert!(geometries.find_all(&ray).is_none());
    }

    #[test]
    fn test_aggregate_unions_children() {
        let mut geometries = Geometries::new();
        // Three single-hit planes facing the ray
        for z in [-1.0, -2.0, -3.0] {
            geometries.add(Plane::new(Vec3::new(0.0, 0.0, z), Vec3::Z).unwrap());
        }

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z).unwrap();
        let hits = geometries.find_all(&ray).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_aggregate_mixed_children() {
        let mut geometries = Geometries::new();
        geometries.add(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0).unwrap());
        geometries.add(
            Polygon::triangle(
                Vec3::new(-1.0, -1.0, -1.0),
                Vec3::new(1.0, -1.0, -1.0),
                Vec3::new(0.0, 1.0, -1.0),
            )
            .unwrap(),
        );
        // Off to the side, missed
        geometries.add(Sphere::new(Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap());

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z).unwrap();
        let hits = geometries.find_all(&ray).unwrap();
        assert_eq!(hits.len(), 3);

        let closest = geometries.find_closest(&ray, f32::INFINITY).unwrap();
        assert!((closest.point.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_nested_and_shared_members() {
        let shared: Arc<dyn Intersectable> = Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -4.0), 1.0).unwrap());

        let inner: Geometries = [shared.clone()].into_iter().collect();
        let mut outer = Geometries::new();
        outer.add(inner);
        outer.add_shared(shared);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z).unwrap();
        assert_eq!(outer.find_all(&ray).unwrap().len(), 4);
        assert_eq!(outer.len(), 2);
    }
}
