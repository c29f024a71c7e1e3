//! Scene description consumed by the shading engine.
//!
//! A scene is assembled once through [`SceneBuilder`] and is read-only
//! afterwards, so render workers can share it without locking.

use std::sync::Arc;

use crate::geometry::{Geometries, Intersectable};
use crate::light::{AmbientLight, LightSource};
use crate::material::Color;

/// Everything a render needs besides the camera.
pub struct Scene {
    name: String,
    background: Color,
    ambient_light: AmbientLight,
    geometries: Geometries,
    lights: Vec<Box<dyn LightSource>>,
}

impl Scene {
    /// Start building a scene.
    pub fn builder(name: impl Into<String>) -> SceneBuilder {
        SceneBuilder::new(name)
    }

    /// An empty scene: black background, no ambient light, nothing in it.
    pub fn new(name: impl Into<String>) -> Self {
        SceneBuilder::new(name).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn ambient_light(&self) -> &AmbientLight {
        &self.ambient_light
    }

    pub fn geometries(&self) -> &Geometries {
        &self.geometries
    }

    pub fn lights(&self) -> &[Box<dyn LightSource>] {
        &self.lights
    }
}

/// Builder for [`Scene`].
pub struct SceneBuilder {
    name: String,
    background: Color,
    ambient_light: AmbientLight,
    geometries: Geometries,
    lights: Vec<Box<dyn LightSource>>,
}

impl SceneBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Color::ZERO,
            ambient_light: AmbientLight::NONE,
            geometries: Geometries::new(),
            lights: Vec::new(),
        }
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn ambient_light(mut self, ambient_light: AmbientLight) -> Self {
        self.ambient_light = ambient_light;
        self
    }

    /// Add one intersectable to the scene's aggregate.
    pub fn geometry(mut self, item: impl Intersectable + 'static) -> Self {
        self.geometries.add(item);
        self
    }

    /// Add an intersectable that is also referenced elsewhere.
    pub fn shared_geometry(mut self, item: Arc<dyn Intersectable>) -> Self {
        self.geometries.add_shared(item);
        self
    }

    /// Replace the whole aggregate.
    pub fn geometries(mut self, geometries: Geometries) -> Self {
        self.geometries = geometries;
        self
    }

    pub fn light(mut self, light: impl LightSource + 'static) -> Self {
        self.lights.push(Box::new(light));
        self
    }

    pub fn build(self) -> Scene {
        log::debug!(
            "Scene '{}': {} top-level geometries, {} lights",
            self.name,
            self.geometries.len(),
            self.lights.len()
        );

        Scene {
            name: self.name,
            background: self.background,
            ambient_light: self.ambient_light,
            geometries: self.geometries,
            lights: self.lights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Sphere;
    use crate::light::PointLight;
    use glint_math::Vec3;

    #[test]
    fn test_empty_scene() {
        let scene = Scene::new("empty");
        assert_eq!(scene.name(), "empty");
        assert_eq!(scene.background(), Color::ZERO);
        assert!(scene.geometries().is_empty());
        assert!(scene.lights().is_empty());
    }

    #[test]
    fn test_builder_collects_parts() {
        let scene = Scene::builder("one sphere")
            .background(Color::new(0.1, 0.2, 0.3))
            .ambient_light(AmbientLight::new(Color::ONE, 0.1))
            .geometry(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0).unwrap())
            .light(PointLight::new(Color::ONE, Vec3::Y))
            .build();

        assert_eq!(scene.background(), Color::new(0.1, 0.2, 0.3));
        assert_eq!(scene.ambient_light().intensity(), Color::splat(0.1));
        assert_eq!(scene.geometries().len(), 1);
        assert_eq!(scene.lights().len(), 1);
    }
}
