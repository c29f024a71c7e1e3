//! Recursive Whitted-style shading engine.
//!
//! Each hit combines:
//! - Emission and ambient light
//! - Diffuse and specular terms per light, gated by shadow rays that let
//!   light through transparent occluders
//! - Reflected and refracted rays, traced recursively until the depth runs
//!   out or the accumulated attenuation becomes negligible

use crate::geometry::{GeoPoint, Intersectable};
use crate::light::{LightError, LightSource};
use crate::material::{Color, Material};
use crate::Scene;
use glint_math::{align_zero, MathError, Ray, Vec3, VectorExt};
use thiserror::Error;

/// Default bound on primary + secondary bounces.
pub const DEFAULT_MAX_DEPTH: u32 = 10;

/// Default attenuation below which a contribution is dropped.
pub const DEFAULT_MIN_K: f32 = 0.001;

/// Errors raised while shading a single ray.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    #[error(transparent)]
    Light(#[from] LightError),

    #[error(transparent)]
    Math(#[from] MathError),
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Shading engine over a read-only scene.
pub struct RayTracer<'s> {
    scene: &'s Scene,
    max_depth: u32,
    min_k: f32,
}

impl<'s> RayTracer<'s> {
    /// Create a tracer with the default depth and cutoff.
    pub fn new(scene: &'s Scene) -> Self {
        Self {
            scene,
            max_depth: DEFAULT_MAX_DEPTH,
            min_k: DEFAULT_MIN_K,
        }
    }

    /// Maximum recursion depth. Zero renders only the background.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Attenuation cutoff for recursive and shadow contributions.
    pub fn with_min_k(mut self, min_k: f32) -> Self {
        self.min_k = min_k;
        self
    }

    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    /// Compute the color seen along `ray`.
    pub fn trace_ray(&self, ray: &Ray) -> TraceResult<Color> {
        if self.max_depth == 0 {
            return Ok(self.scene.background());
        }

        match self.scene.geometries().find_closest(ray, f32::INFINITY) {
            Some(gp) => self.calc_color(&gp, ray, self.max_depth, Vec3::ONE),
            None => Ok(self.scene.background()),
        }
    }

    /// Average color of several sampling rays for one pixel.
    pub fn trace_rays(&self, rays: &[Ray]) -> TraceResult<Color> {
        if rays.is_empty() {
            return Ok(self.scene.background());
        }

        let mut sum = Color::ZERO;
        for ray in rays {
            sum += self.trace_ray(ray)?;
        }
        Ok(sum / rays.len() as f32)
    }

    /// Color at a hit, `level` bounces left, `k` the attenuation
    /// accumulated along the path so far.
    fn calc_color(&self, gp: &GeoPoint<'_>, ray: &Ray, level: u32, k: Vec3) -> TraceResult<Color> {
        let color = self.local_effects(gp, ray, k)?;
        if level <= 1 {
            return Ok(color);
        }
        Ok(color + self.global_effects(gp, ray, level, k)?)
    }

    fn local_effects(&self, gp: &GeoPoint<'_>, ray: &Ray, k: Vec3) -> TraceResult<Color> {
        let material = gp.material();
        let mut color = gp.emission() + self.scene.ambient_light().intensity() * material.kd;

        let n = gp.normal();
        let v = ray.direction();
        let nv = align_zero(n.dot(v));
        if nv == 0.0 {
            return Ok(color);
        }

        for light in self.scene.lights() {
            let l = light.direction_to(gp.point)?;
            let nl = align_zero(n.dot(l));

            // Light and viewer must be on the same side of the surface
            if nl * nv <= 0.0 {
                continue;
            }

            let ktr = self.transparency(gp, &**light, l, n)?;
            if (ktr * k).all_below(self.min_k) {
                continue;
            }

            let intensity = light.intensity_at(gp.point)? * ktr;
            color += intensity * (diffusive(material, nl) + specular(material, n, l, nl, v));
        }

        Ok(color)
    }

    /// Fraction of the light reaching the hit point through the geometry
    /// between them; opaque occluders block it entirely.
    fn transparency(
        &self,
        gp: &GeoPoint<'_>,
        light: &dyn LightSource,
        l: Vec3,
        n: Vec3,
    ) -> TraceResult<Vec3> {
        let shadow_ray = Ray::offset(gp.point, -l, n)?;
        let distance = light.distance_to(gp.point);

        let Some(occluders) = self.scene.geometries().find_intersections(&shadow_ray, distance) else {
            return Ok(Vec3::ONE);
        };

        let mut ktr = Vec3::ONE;
        for occluder in occluders {
            ktr *= occluder.material().kt;
            if ktr.all_below(self.min_k) {
                return Ok(Vec3::ZERO);
            }
        }
        Ok(ktr)
    }

    fn global_effects(&self, gp: &GeoPoint<'_>, ray: &Ray, level: u32, k: Vec3) -> TraceResult<Color> {
        let material = gp.material();
        let n = gp.normal();
        let v = ray.direction();

        let refracted = self.global_effect(|| Ray::offset(gp.point, v, n), level, k, material.kt)?;
        let reflected = self.global_effect(
            || Ray::offset(gp.point, v - n * (2.0 * v.dot(n)), n),
            level,
            k,
            material.kr,
        )?;

        Ok(refracted + reflected)
    }

    /// Contribution of one secondary ray scaled by its coefficient `kx`.
    ///
    /// The ray is only built once the contribution is known to matter.
    fn global_effect<F>(&self, make_ray: F, level: u32, k: Vec3, kx: Vec3) -> TraceResult<Color>
    where
        F: FnOnce() -> glint_math::MathResult<Ray>,
    {
        let kkx = k * kx;
        if kkx.all_below(self.min_k) {
            return Ok(Color::ZERO);
        }

        let ray = make_ray()?;
        let Some(gp) = self.scene.geometries().find_closest(&ray, f32::INFINITY) else {
            return Ok(self.scene.background() * kx);
        };

        if align_zero(gp.normal().dot(ray.direction())) == 0.0 {
            return Ok(Color::ZERO);
        }

        Ok(self.calc_color(&gp, &ray, level - 1, kkx)? * kx)
    }
}

fn diffusive(material: &Material, nl: f32) -> Color {
    material.kd * nl.abs()
}

fn specular(material: &Material, n: Vec3, l: Vec3, nl: f32, v: Vec3) -> Color {
    let r = l - n * (2.0 * nl);
    let minus_vr = align_zero(-v.dot(r));
    if minus_vr <= 0.0 {
        return Color::ZERO;
    }
    material.ks * minus_vr.powi(material.shininess)
}
