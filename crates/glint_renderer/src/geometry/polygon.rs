//! Convex planar polygon primitive (triangles included).

use super::{plane_distance, GeoPoint, Geometry, GeometryError, GeometryResult, Intersectable, Plane};
use crate::{Color, Material, Surface};
use std::f32::consts::TAU;

use glint_math::{align_zero, is_zero, Interval, Ray, Vec3};

/// A convex polygon with vertices ordered along its edge path.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Vec3>,
    /// Supporting plane, through the first three vertices
    plane: Plane,
    surface: Surface,
}

impl Polygon {
    /// Create a polygon, validating the vertex list.
    ///
    /// The vertices must be at least three, pairwise distinct along the edge
    /// path, coplanar, and ordered so that the polygon is convex (every turn
    /// along the path bends the same way).
    pub fn new(vertices: Vec<Vec3>) -> GeometryResult<Self> {
        let count = vertices.len();
        if count < 3 {
            return Err(GeometryError::TooFewVertices(count));
        }

        for i in 0..count {
            let j = (i + 1) % count;
            if is_zero(vertices[i].distance(vertices[j])) {
                return Err(GeometryError::CoincidentVertices(i, j));
            }
        }

        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        if count > 3 {
            Self::check_convex(&vertices, plane.unit_normal())?;
        }

        Ok(Self {
            vertices,
            plane,
            surface: Surface::default(),
        })
    }

    /// Create a triangle.
    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> GeometryResult<Self> {
        Self::new(vec![a, b, c])
    }

    fn check_convex(vertices: &[Vec3], normal: Vec3) -> GeometryResult<()> {
        let count = vertices.len();

        // Turn direction at vertex 0, from the closing edge into the first one
        let mut edge1 = vertices[count - 1] - vertices[count - 2];
        let mut edge2 = vertices[0] - vertices[count - 1];
        let positive = edge1.cross(edge2).dot(normal) > 0.0;
        let mut turning = turn_angle(edge1, edge2, normal);

        for i in 1..count {
            if !is_zero((vertices[i] - vertices[0]).dot(normal)) {
                return Err(GeometryError::NonCoplanar(i));
            }

            edge1 = edge2;
            edge2 = vertices[i] - vertices[i - 1];
            if positive != (edge1.cross(edge2).dot(normal) > 0.0) {
                return Err(GeometryError::NonConvex(i));
            }
            turning += turn_angle(edge1, edge2, normal);
        }

        // Star polygons turn the same way everywhere but wind around more than once
        if (turning.abs() - TAU).abs() > 1e-2 {
            return Err(GeometryError::NonConvex(0));
        }

        Ok(())
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.surface.material = material;
        self
    }

    pub fn with_emission(mut self, emission: Color) -> Self {
        self.surface.emission = emission;
        self
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Same-sign test: the ray passes inside iff it sees every edge turning
    /// the same way. Hitting an edge or vertex exactly counts as outside.
    fn ray_passes_inside(&self, ray: &Ray) -> bool {
        let origin = ray.origin();
        let direction = ray.direction();
        let count = self.vertices.len();

        let mut expected = 0.0f32;
        for i in 0..count {
            let a = self.vertices[i] - origin;
            let b = self.vertices[(i + 1) % count] - origin;
            let side = align_zero(direction.dot(a.cross(b)));
            if side == 0.0 {
                return false;
            }
            if expected == 0.0 {
                expected = side.signum();
            } else if side.signum() != expected {
                return false;
            }
        }

        true
    }
}

/// Signed angle from `edge1` to `edge2` about `normal`.
fn turn_angle(edge1: Vec3, edge2: Vec3, normal: Vec3) -> f32 {
    edge1.cross(edge2).dot(normal).atan2(edge1.dot(edge2))
}

impl Intersectable for Polygon {
    fn find_intersections<'a>(&'a self, ray: &Ray, max_distance: f32) -> Option<Vec<GeoPoint<'a>>> {
        let t = plane_distance(
            self.plane.point(),
            self.plane.unit_normal(),
            ray,
            Interval::ray_hits(max_distance),
        )?;

        if !self.ray_passes_inside(ray) {
            return None;
        }

        Some(vec![GeoPoint::new(self, ray.at(t))])
    }
}

impl Geometry for Polygon {
    fn normal(&self, _point: Vec3) -> Vec3 {
        self.plane.unit_normal()
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::VectorExt;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_polygon_convex_square() {
        let polygon = Polygon::new(square()).unwrap();
        assert_eq!(polygon.vertices().len(), 4);
        assert!(polygon.normal(Vec3::ZERO).approx_eq(Vec3::Z));
    }

    #[test]
    fn test_polygon_reversed_winding_flips_normal() {
        let mut vertices = square();
        vertices.reverse();
        let polygon = Polygon::new(vertices).unwrap();
        assert!(polygon.normal(Vec3::ZERO).approx_eq(-Vec3::Z));
    }

    #[test]
    fn test_polygon_rejects_crossed_order() {
        let crossed = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        assert!(matches!(
            Polygon::new(crossed).unwrap_err(),
            GeometryError::NonConvex(_)
        ));

        let crossed = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ];
        assert!(matches!(
            Polygon::new(crossed).unwrap_err(),
            GeometryError::NonConvex(_)
        ));
    }

    #[test]
    fn test_polygon_rejects_pentagram() {
        let corner = |k: usize| {
            let angle = TAU * k as f32 / 5.0;
            Vec3::new(angle.cos(), angle.sin(), 0.0)
        };

        // Convex pentagon is fine
        assert!(Polygon::new((0..5).map(corner).collect()).is_ok());

        // Same corners visited every second one: a star that winds twice
        let star = [0, 2, 4, 1, 3].into_iter().map(corner).collect();
        assert!(matches!(
            Polygon::new(star).unwrap_err(),
            GeometryError::NonConvex(_)
        ));
    }

    #[test]
    fn test_polygon_rejects_concave() {
        let arrow = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(1.0, 0.5, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
        ];
        assert!(matches!(
            Polygon::new(arrow).unwrap_err(),
            GeometryError::NonConvex(_)
        ));
    }

    #[test]
    fn test_polygon_rejects_non_coplanar() {
        let mut vertices = square();
        vertices[3].z = 1.0;
        assert_eq!(
            Polygon::new(vertices).unwrap_err(),
            GeometryError::NonCoplanar(3)
        );
    }

    #[test]
    fn test_polygon_rejects_degenerate_input() {
        assert_eq!(
            Polygon::new(vec![Vec3::ZERO, Vec3::X]).unwrap_err(),
            GeometryError::TooFewVertices(2)
        );
        assert_eq!(
            Polygon::triangle(Vec3::ZERO, Vec3::ZERO, Vec3::Y).unwrap_err(),
            GeometryError::CoincidentVertices(0, 1)
        );
        assert_eq!(
            Polygon::triangle(Vec3::ZERO, Vec3::X, Vec3::new(3.0, 0.0, 0.0)).unwrap_err(),
            GeometryError::CollinearPoints
        );
    }

    #[test]
    fn test_triangle_hit() {
        // Triangle in XY plane at z=-1
        let tri = Polygon::triangle(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
        )
        .unwrap();

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z).unwrap();
        let hits = tri.find_all(&ray).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].point.approx_eq(Vec3::new(0.0, 0.0, -1.0)));

        // Ray pointing away
        let away = Ray::new(Vec3::ZERO, Vec3::Z).unwrap();
        assert!(tri.find_all(&away).is_none());
    }

    #[test]
    fn test_triangle_outside_and_on_edge() {
        let tri = Polygon::triangle(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(2.0, 0.0, -1.0),
            Vec3::new(0.0, 2.0, -1.0),
        )
        .unwrap();

        // Beyond the hypotenuse
        let outside = Ray::new(Vec3::new(1.5, 1.5, 0.0), -Vec3::Z).unwrap();
        assert!(tri.find_all(&outside).is_none());

        // Exactly on an edge
        let edge = Ray::new(Vec3::new(1.0, 0.0, 0.0), -Vec3::Z).unwrap();
        assert!(tri.find_all(&edge).is_none());

        // Exactly on a vertex
        let vertex = Ray::new(Vec3::new(0.0, 0.0, 0.0), -Vec3::Z).unwrap();
        assert!(tri.find_all(&vertex).is_none());

        let inside = Ray::new(Vec3::new(0.5, 0.5, 0.0), -Vec3::Z).unwrap();
        assert!(tri.find_all(&inside).is_some());
    }

    #[test]
    fn test_square_hit_from_behind() {
        let polygon = Polygon::new(square()).unwrap();
        let ray = Ray::new(Vec3::new(0.5, 0.5, -3.0), Vec3::Z).unwrap();
        let hits = polygon.find_all(&ray).unwrap();
        assert!(hits[0].point.approx_eq(Vec3::new(0.5, 0.5, 0.0)));
    }
}
