//! Phong material coefficients for surface shading.

use glint_math::Vec3;
use serde::{Deserialize, Serialize};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Values accepted wherever a 3-channel coefficient is expected.
///
/// A scalar applies the same factor to all three channels.
pub trait IntoCoefficients {
    fn into_coefficients(self) -> Vec3;
}

impl IntoCoefficients for f32 {
    fn into_coefficients(self) -> Vec3 {
        Vec3::splat(self)
    }
}

impl IntoCoefficients for Vec3 {
    fn into_coefficients(self) -> Vec3 {
        self
    }
}

/// How a surface responds to light.
///
/// Every coefficient is per channel. The defaults describe a black,
/// fully opaque, non-reflective surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Diffuse attenuation
    pub kd: Vec3,
    /// Specular attenuation
    pub ks: Vec3,
    /// Transparency: how much light passes straight through
    pub kt: Vec3,
    /// Reflectivity: how much light bounces off as a mirror
    pub kr: Vec3,
    /// Specular highlight exponent
    pub shininess: i32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kd: Vec3::ZERO,
            ks: Vec3::ZERO,
            kt: Vec3::ZERO,
            kr: Vec3::ZERO,
            shininess: 0,
        }
    }
}

impl Material {
    /// Create a new black, opaque material.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kd(mut self, kd: impl IntoCoefficients) -> Self {
        self.kd = kd.into_coefficients();
        self
    }

    pub fn with_ks(mut self, ks: impl IntoCoefficients) -> Self {
        self.ks = ks.into_coefficients();
        self
    }

    pub fn with_kt(mut self, kt: impl IntoCoefficients) -> Self {
        self.kt = kt.into_coefficients();
        self
    }

    pub fn with_kr(mut self, kr: impl IntoCoefficients) -> Self {
        self.kr = kr.into_coefficients();
        self
    }

    pub fn with_shininess(mut self, shininess: i32) -> Self {
        self.shininess = shininess;
        self
    }
}

/// Everything the shading engine reads from an intersected geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Surface {
    /// Light emitted by the surface itself
    pub emission: Color,
    pub material: Material,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_coefficients_fill_all_channels() {
        let m = Material::new().with_kd(0.5).with_kr(Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(m.kd, Vec3::splat(0.5));
        assert_eq!(m.kr, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(m.ks, Vec3::ZERO);
    }

    #[test]
    fn test_default_is_opaque_black() {
        let s = Surface::default();
        assert_eq!(s.emission, Color::ZERO);
        assert_eq!(s.material.kt, Vec3::ZERO);
        assert_eq!(s.material.shininess, 0);
    }
}
