//! Image rendering over a worker pool.
//!
//! Implements:
//! - Per-pixel sampling through the camera and shading engine
//! - Synchronous or rayon-pooled scheduling via [`PixelManager`]
//! - Progress reporting and abort on the first failed pixel

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::pixel_manager::{Pixel, PixelManager, Progress};
use crate::tracer::{RayTracer, TraceError, TraceResult, DEFAULT_MAX_DEPTH, DEFAULT_MIN_K};
use crate::{Camera, Color, Scene};
use glint_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to render pixel (row {row}, col {col})")]
    Pixel {
        row: u32,
        col: u32,
        #[source]
        source: TraceError,
    },

    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Worker threads; 0 renders synchronously on the calling thread
    pub threads: usize,
    /// Progress reporting step in percent; 0 disables reporting
    pub progress_interval: u32,
    /// Maximum recursion depth of the shading engine
    pub max_depth: u32,
    /// Attenuation below which recursive contributions are dropped
    pub min_k: f32,
    /// Seed for the per-pixel sampling generators
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            threads: rayon::current_num_threads(),
            progress_interval: 10,
            max_depth: DEFAULT_MAX_DEPTH,
            min_k: DEFAULT_MIN_K,
            seed: 0,
        }
    }
}

impl RenderSettings {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_progress_interval(mut self, percent: u32) -> Self {
        self.progress_interval = percent;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_k(mut self, min_k: f32) -> Self {
        self.min_k = min_k;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Clamp a channel to [0, 1] and scale to a byte.
#[inline]
fn channel_to_u8(x: f32) -> u8 {
    (255.0 * Interval::UNIT.clamp(x)).round() as u8
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
    ]
}

/// Simple image buffer for storing render output.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (row, col).
    pub fn get(&self, row: u32, col: u32) -> Color {
        self.pixels[self.index(row, col)]
    }

    /// Set the pixel at (row, col).
    pub fn set(&mut self, row: u32, col: u32, color: Color) {
        let index = self.index(row, col);
        self.pixels[index] = color;
    }

    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Paint every `interval`-th row and column with `color`.
    pub fn print_grid(&mut self, interval: u32, color: Color) {
        if interval == 0 {
            return;
        }

        for row in 0..self.height {
            for col in 0..self.width {
                if row % interval == 0 || col % interval == 0 {
                    self.set(row, col, color);
                }
            }
        }
    }

    /// Convert to packed RGB bytes, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }
}

/// Render a single pixel: average of all the camera's samples through it.
pub fn render_pixel(
    tracer: &RayTracer<'_>,
    camera: &Camera,
    col: u32,
    row: u32,
    rng: &mut dyn RngCore,
) -> TraceResult<Color> {
    let rays = camera.construct_rays(col, row, rng)?;
    tracer.trace_rays(&rays)
}

/// Sampling generator for one pixel, independent of scheduling order.
fn pixel_rng(seed: u64, pixel: Pixel, width: u32) -> StdRng {
    let index = pixel.row as u64 * width as u64 + pixel.col as u64;
    StdRng::seed_from_u64(seed ^ index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// What one worker produced before the queue ran dry or the render aborted.
#[derive(Default)]
struct WorkerOutput {
    colors: Vec<(Pixel, Color)>,
    error: Option<RenderError>,
}

/// Forwards progress reports to the caller in increasing order.
///
/// Workers report after leaving the pixel manager's lock, so a later
/// report can arrive first; anything not past the last delivery is dropped.
struct ProgressSink<F> {
    callback: F,
    delivered: Option<u32>,
}

impl<F: FnMut(Progress)> ProgressSink<F> {
    fn new(callback: F) -> Self {
        Self {
            callback,
            delivered: None,
        }
    }

    fn deliver(&mut self, progress: Progress) {
        if self.delivered.is_some_and(|last| progress.per_mille <= last) {
            return;
        }
        self.delivered = Some(progress.per_mille);
        (self.callback)(progress);
    }
}

/// Shared state of one render run.
struct Job<'a, F> {
    tracer: RayTracer<'a>,
    camera: &'a Camera,
    manager: PixelManager,
    on_progress: Mutex<ProgressSink<F>>,
    abort: AtomicBool,
    seed: u64,
}

impl<F: FnMut(Progress)> Job<'_, F> {
    fn work(&self) -> WorkerOutput {
        let mut output = WorkerOutput::default();
        let width = self.manager.cols();

        while !self.abort.load(Ordering::Relaxed) {
            let Some(pixel) = self.manager.next_pixel() else {
                break;
            };

            let mut rng = pixel_rng(self.seed, pixel, width);
            match render_pixel(&self.tracer, self.camera, pixel.col, pixel.row, &mut rng) {
                Ok(color) => output.colors.push((pixel, color)),
                Err(source) => {
                    log::error!("Pixel (row {}, col {}) failed: {}", pixel.row, pixel.col, source);
                    self.abort.store(true, Ordering::Relaxed);
                    output.error = Some(RenderError::Pixel {
                        row: pixel.row,
                        col: pixel.col,
                        source,
                    });
                    break;
                }
            }

            if let Some(progress) = self.manager.pixel_done() {
                self.on_progress
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .deliver(progress);
            }
        }

        output
    }
}

/// Renders scenes through a camera with fixed settings.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render the scene to an image buffer.
    pub fn render(&self, scene: &Scene, camera: &Camera) -> RenderResult<ImageBuffer> {
        self.render_with_progress(scene, camera, |_| {})
    }

    /// Render the scene, passing every progress report to `on_progress`.
    ///
    /// The first pixel that fails stops all workers; the failure with the
    /// lowest coordinate is returned.
    pub fn render_with_progress<F>(
        &self,
        scene: &Scene,
        camera: &Camera,
        on_progress: F,
    ) -> RenderResult<ImageBuffer>
    where
        F: FnMut(Progress) + Send,
    {
        let width = camera.image_width();
        let height = camera.image_height();
        let threads = self.settings.threads;

        log::info!(
            "Rendering '{}' at {}x{}, {} spp, {} threads",
            scene.name(),
            width,
            height,
            camera.samples_per_pixel(),
            threads
        );
        let start = Instant::now();

        let job = Job {
            tracer: RayTracer::new(scene)
                .with_max_depth(self.settings.max_depth)
                .with_min_k(self.settings.min_k),
            camera,
            manager: PixelManager::new(height, width, self.settings.progress_interval),
            on_progress: Mutex::new(ProgressSink::new(on_progress)),
            abort: AtomicBool::new(false),
            seed: self.settings.seed,
        };

        let outputs = if threads == 0 {
            vec![job.work()]
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("glint-worker-{}", i))
                .build()?;
            pool.broadcast(|_| job.work())
        };

        let mut image = ImageBuffer::new(width, height);
        let mut failure: Option<RenderError> = None;

        for output in outputs {
            for (pixel, color) in output.colors {
                image.set(pixel.row, pixel.col, color);
            }
            if let Some(error) = output.error {
                failure = match failure {
                    Some(current) if error_pixel(&current) <= error_pixel(&error) => Some(current),
                    _ => Some(error),
                };
            }
        }

        if let Some(error) = failure {
            return Err(error);
        }

        log::info!("Render complete in {:.2}s", start.elapsed().as_secs_f32());
        Ok(image)
    }
}

fn error_pixel(error: &RenderError) -> (u32, u32) {
    match error {
        RenderError::Pixel { row, col, .. } => (*row, *col),
        RenderError::ThreadPool(_) => (0, 0),
    }
}
