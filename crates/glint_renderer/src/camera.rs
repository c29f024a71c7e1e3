//! Camera for ray generation.
//!
//! A [`CameraConfig`] is assembled by value, then handed once to
//! [`Camera::new`], which validates it and derives the view basis.
//! The resulting camera is immutable and shared by all render workers.

use glint_math::{MathError, MathResult, Ray, Vec3, VectorExt};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a camera.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("forward and up vectors must be orthogonal")]
    NotOrthogonal,

    #[error("up vector is parallel to the viewing direction")]
    UpParallelToForward,

    #[error("camera target coincides with the camera location")]
    TargetAtLocation,

    #[error("view plane size must be positive, got {width}x{height}")]
    ViewPlaneSize { width: f32, height: f32 },

    #[error("view plane distance must be positive, got {0}")]
    ViewPlaneDistance(f32),

    #[error("image resolution must be positive, got {width}x{height}")]
    Resolution { width: u32, height: u32 },

    #[error("at least one sample per pixel is required")]
    NoSamples,

    #[error("invalid depth of field: focal length {focal_length}, aperture radius {aperture_radius}")]
    DepthOfField {
        focal_length: f32,
        aperture_radius: f32,
    },

    #[error(transparent)]
    Math(#[from] MathError),
}

pub type CameraResult<T> = Result<T, CameraError>;

/// Thin-lens settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthOfField {
    /// Distance from the eye, along the viewing direction, of the plane in focus
    pub focal_length: f32,
    /// Radius of the disk sample origins are drawn from
    pub aperture_radius: f32,
}

/// Camera configuration, validated by [`Camera::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub location: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub view_plane_width: f32,
    pub view_plane_height: f32,
    pub view_plane_distance: f32,
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub depth_of_field: Option<DepthOfField>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            view_plane_width: 2.0,
            view_plane_height: 2.0,
            view_plane_distance: 1.0,
            image_width: 400,
            image_height: 400,
            samples_per_pixel: 1,
            depth_of_field: None,
        }
    }
}

impl CameraConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: Vec3) -> Self {
        self.location = location;
        self
    }

    /// Set the viewing direction and the up vector. They must be orthogonal.
    pub fn with_direction(mut self, forward: Vec3, up: Vec3) -> Self {
        self.forward = forward;
        self.up = up;
        self
    }

    /// Aim the camera at `target`, straightening `up` to be orthogonal to
    /// the resulting viewing direction.
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> CameraResult<Self> {
        let forward = (target - self.location)
            .unit()
            .map_err(|_| CameraError::TargetAtLocation)?;
        let up = (up - forward * up.dot(forward))
            .unit()
            .map_err(|_| CameraError::UpParallelToForward)?;

        self.forward = forward;
        self.up = up;
        Ok(self)
    }

    pub fn with_view_plane(mut self, width: f32, height: f32) -> Self {
        self.view_plane_width = width;
        self.view_plane_height = height;
        self
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.view_plane_distance = distance;
        self
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set the number of anti-aliasing samples per pixel.
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples_per_pixel = samples;
        self
    }

    pub fn with_depth_of_field(mut self, focal_length: f32, aperture_radius: f32) -> Self {
        self.depth_of_field = Some(DepthOfField {
            focal_length,
            aperture_radius,
        });
        self
    }

    /// Validate and build the camera.
    pub fn build(self) -> CameraResult<Camera> {
        Camera::new(self)
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    location: Vec3,
    forward: Vec3,
    up: Vec3,
    right: Vec3,
    view_plane_width: f32,
    view_plane_height: f32,
    view_plane_distance: f32,
    image_width: u32,
    image_height: u32,
    samples_per_pixel: u32,
    depth_of_field: Option<DepthOfField>,
}

impl Camera {
    /// Validate `config` and derive the orthonormal view basis.
    pub fn new(config: CameraConfig) -> CameraResult<Self> {
        let forward = config.forward.unit()?;
        let up = config.up.unit()?;
        if !forward.is_orthogonal_to(up) {
            return Err(CameraError::NotOrthogonal);
        }
        let right = forward.cross(up).unit()?;

        let (width, height) = (config.view_plane_width, config.view_plane_height);
        if width <= 0.0 || height <= 0.0 {
            return Err(CameraError::ViewPlaneSize { width, height });
        }
        if config.view_plane_distance <= 0.0 {
            return Err(CameraError::ViewPlaneDistance(config.view_plane_distance));
        }
        if config.image_width == 0 || config.image_height == 0 {
            return Err(CameraError::Resolution {
                width: config.image_width,
                height: config.image_height,
            });
        }
        if config.samples_per_pixel == 0 {
            return Err(CameraError::NoSamples);
        }
        if let Some(dof) = config.depth_of_field {
            let open = dof.aperture_radius > 0.0;
            if dof.aperture_radius < 0.0 || (open && dof.focal_length <= 0.0) {
                return Err(CameraError::DepthOfField {
                    focal_length: dof.focal_length,
                    aperture_radius: dof.aperture_radius,
                });
            }
        }

        log::debug!(
            "Camera at {} looking {} (up {}, right {}), {}x{} px, {} spp",
            config.location,
            forward,
            up,
            right,
            config.image_width,
            config.image_height,
            config.samples_per_pixel
        );

        Ok(Self {
            location: config.location,
            forward,
            up,
            right,
            view_plane_width: width,
            view_plane_height: height,
            view_plane_distance: config.view_plane_distance,
            image_width: config.image_width,
            image_height: config.image_height,
            samples_per_pixel: config.samples_per_pixel,
            depth_of_field: config.depth_of_field.filter(|dof| dof.aperture_radius > 0.0),
        })
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    /// The ray from the eye through the center of pixel (`col`, `row`) of
    /// an `nx` by `ny` grid laid over the view plane.
    pub fn construct_ray(&self, nx: u32, ny: u32, col: u32, row: u32) -> MathResult<Ray> {
        let target = self.view_plane_point(nx, ny, col as f32, row as f32);
        Ray::new(self.location, target - self.location)
    }

    /// All sampling rays for pixel (`col`, `row`) of the camera's own image.
    ///
    /// Sample targets are jittered inside the pixel footprint on a
    /// stratified grid. With depth of field, origins are additionally
    /// spread over the aperture disk and aimed at the focal plane. A single
    /// sample without depth of field is exactly [`Camera::construct_ray`].
    pub fn construct_rays(&self, col: u32, row: u32, rng: &mut dyn RngCore) -> MathResult<Vec<Ray>> {
        let (nx, ny) = (self.image_width, self.image_height);

        sample_offsets(self.samples_per_pixel, rng)
            .into_iter()
            .map(|(dx, dy)| {
                let target = self.view_plane_point(nx, ny, col as f32 + dx, row as f32 + dy);
                match self.depth_of_field {
                    Some(dof) => self.defocused_ray(target, dof, rng),
                    None => Ray::new(self.location, target - self.location),
                }
            })
            .collect()
    }

    /// Point on the view plane at fractional pixel coordinates (x, y).
    fn view_plane_point(&self, nx: u32, ny: u32, x: f32, y: f32) -> Vec3 {
        let center = self.location + self.forward * self.view_plane_distance;

        let pixel_width = self.view_plane_width / nx as f32;
        let pixel_height = self.view_plane_height / ny as f32;

        let xj = (x - (nx as f32 - 1.0) / 2.0) * pixel_width;
        let yi = -(y - (ny as f32 - 1.0) / 2.0) * pixel_height;

        center + self.right * xj + self.up * yi
    }

    /// A ray through `target` as seen from a random point on the aperture,
    /// converging with its pinhole ray on the focal plane.
    fn defocused_ray(&self, target: Vec3, dof: DepthOfField, rng: &mut dyn RngCore) -> MathResult<Ray> {
        let pinhole = (target - self.location).unit()?;
        let t = dof.focal_length / pinhole.dot(self.forward);
        let focal_point = self.location + pinhole * t;

        let p = random_in_unit_disk(rng);
        let origin = self.location + (self.right * p.x + self.up * p.y) * dof.aperture_radius;

        Ray::new(origin, focal_point - origin)
    }
}

/// Sub-pixel offsets in [-0.5, 0.5]² for `samples` rays.
///
/// One sample is the pixel center. More samples are split over ⌊√n⌋ rows
/// of equal height, the remainder going one each to the first rows; every
/// row is divided into as many columns as it holds samples, and each
/// sample is jittered inside its own cell. The cells tile the whole pixel.
fn sample_offsets(samples: u32, rng: &mut dyn RngCore) -> Vec<(f32, f32)> {
    if samples <= 1 {
        return vec![(0.0, 0.0)];
    }

    let rows = (samples as f32).sqrt().floor().max(1.0) as u32;
    let row_height = 1.0 / rows as f32;
    let mut offsets = Vec::with_capacity(samples as usize);

    for row in 0..rows {
        let cols = samples / rows + u32::from(row < samples % rows);
        let col_width = 1.0 / cols as f32;
        for col in 0..cols {
            offsets.push((
                (col as f32 + rng.gen::<f32>()) * col_width - 0.5,
                (row as f32 + rng.gen::<f32>()) * row_height - 0.5,
            ));
        }
    }

    offsets
}

/// Sample a random point in the unit disk.
fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
