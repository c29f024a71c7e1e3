//! Glint renderer - CPU recursive ray tracing
//!
//! A Whitted-style ray tracer: analytic primitives, Phong shading with
//! shadows, reflection and transparency, rendered over a rayon worker pool.

pub mod camera;
pub mod geometry;
pub mod light;
pub mod material;
pub mod pixel_manager;
pub mod renderer;
pub mod scene;
pub mod tracer;

pub use camera::{Camera, CameraConfig, CameraError, CameraResult, DepthOfField};
pub use geometry::{
    Cylinder, GeoPoint, Geometries, Geometry, GeometryError, GeometryResult, Intersectable, Plane, Polygon,
    Sphere, Tube,
};
pub use light::{AmbientLight, DirectionalLight, LightError, LightResult, LightSource, PointLight, SpotLight};
pub use material::{Color, IntoCoefficients, Material, Surface};
pub use pixel_manager::{Pixel, PixelManager, Progress};
pub use renderer::{color_to_rgb, render_pixel, ImageBuffer, RenderError, RenderResult, RenderSettings, Renderer};
pub use scene::{Scene, SceneBuilder};
pub use tracer::{RayTracer, TraceError, TraceResult};

/// Re-export the math types the public API is written in
pub use glint_math::{Interval, Ray, Vec3};
