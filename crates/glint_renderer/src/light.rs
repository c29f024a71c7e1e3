//! Light sources: ambient fill plus directional, point and spot lights.

use crate::material::{Color, IntoCoefficients};
use glint_math::{Vec3, VectorExt};
use thiserror::Error;

/// Errors raised by light evaluation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LightError {
    #[error("point {0} coincides with the light position, direction is undefined")]
    CoincidentPoint(Vec3),
}

pub type LightResult<T> = Result<T, LightError>;

/// Uniform light reaching every point regardless of geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    intensity: Color,
}

impl AmbientLight {
    /// No ambient contribution.
    pub const NONE: AmbientLight = AmbientLight {
        intensity: Color::ZERO,
    };

    /// Create an ambient light of `intensity` scaled by `ka`.
    pub fn new(intensity: Color, ka: impl IntoCoefficients) -> Self {
        Self {
            intensity: intensity * ka.into_coefficients(),
        }
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::NONE
    }
}

/// A light that illuminates points from a direction.
pub trait LightSource: Send + Sync {
    /// Intensity arriving at `point`, after attenuation.
    fn intensity_at(&self, point: Vec3) -> LightResult<Color>;

    /// Unit vector from the light towards `point`.
    fn direction_to(&self, point: Vec3) -> LightResult<Vec3>;

    /// Distance from the light to `point`; infinite for lights at infinity.
    fn distance_to(&self, point: Vec3) -> f32;
}

/// A light infinitely far away, shining along one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    intensity: Color,
    direction: Vec3,
}

impl DirectionalLight {
    /// Create a directional light. Fails on a zero direction.
    pub fn new(intensity: Color, direction: Vec3) -> glint_math::MathResult<Self> {
        Ok(Self {
            intensity,
            direction: direction.unit()?,
        })
    }
}

impl LightSource for DirectionalLight {
    fn intensity_at(&self, _point: Vec3) -> LightResult<Color> {
        Ok(self.intensity)
    }

    fn direction_to(&self, _point: Vec3) -> LightResult<Vec3> {
        Ok(self.direction)
    }

    fn distance_to(&self, _point: Vec3) -> f32 {
        f32::INFINITY
    }
}

/// An omnidirectional light with distance attenuation.
///
/// Intensity at distance `d` is `I0 / (kc + kl·d + kq·d²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    intensity: Color,
    position: Vec3,
    kc: f32,
    kl: f32,
    kq: f32,
}

impl PointLight {
    /// Create a point light with no distance falloff (kc = 1, kl = kq = 0).
    pub fn new(intensity: Color, position: Vec3) -> Self {
        Self {
            intensity,
            position,
            kc: 1.0,
            kl: 0.0,
            kq: 0.0,
        }
    }

    pub fn with_kc(mut self, kc: f32) -> Self {
        self.kc = kc;
        self
    }

    pub fn with_kl(mut self, kl: f32) -> Self {
        self.kl = kl;
        self
    }

    pub fn with_kq(mut self, kq: f32) -> Self {
        self.kq = kq;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    fn attenuated(&self, point: Vec3) -> Color {
        let d = self.position.distance(point);
        self.intensity / (self.kc + self.kl * d + self.kq * d * d)
    }
}

impl LightSource for PointLight {
    fn intensity_at(&self, point: Vec3) -> LightResult<Color> {
        Ok(self.attenuated(point))
    }

    fn direction_to(&self, point: Vec3) -> LightResult<Vec3> {
        (point - self.position)
            .unit()
            .map_err(|_| LightError::CoincidentPoint(point))
    }

    fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }
}

/// A point light narrowed to a beam.
///
/// Intensity is the point-light value scaled by `max(0, dir·l)^narrow_beam`,
/// so nothing is lit beyond 90° off the beam axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    point: PointLight,
    direction: Vec3,
    narrow_beam: i32,
}

impl SpotLight {
    /// Create a spot light. Fails on a zero beam direction.
    pub fn new(intensity: Color, position: Vec3, direction: Vec3) -> glint_math::MathResult<Self> {
        Ok(Self {
            point: PointLight::new(intensity, position),
            direction: direction.unit()?,
            narrow_beam: 1,
        })
    }

    pub fn with_kc(mut self, kc: f32) -> Self {
        self.point = self.point.with_kc(kc);
        self
    }

    pub fn with_kl(mut self, kl: f32) -> Self {
        self.point = self.point.with_kl(kl);
        self
    }

    pub fn with_kq(mut self, kq: f32) -> Self {
        self.point = self.point.with_kq(kq);
        self
    }

    /// Sharpen the beam: higher exponents concentrate light around the axis.
    pub fn with_narrow_beam(mut self, narrow_beam: i32) -> Self {
        self.narrow_beam = narrow_beam.max(1);
        self
    }
}

impl LightSource for SpotLight {
    fn intensity_at(&self, point: Vec3) -> LightResult<Color> {
        let l = self.point.direction_to(point)?;
        let cos = self.direction.dot(l).max(0.0);
        Ok(self.point.attenuated(point) * cos.powi(self.narrow_beam))
    }

    fn direction_to(&self, point: Vec3) -> LightResult<Vec3> {
        self.point.direction_to(point)
    }

    fn distance_to(&self, point: Vec3) -> f32 {
        self.point.distance_to(point)
    }
}
