use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use glint_renderer::RenderSettings;
use log::LevelFilter;

/// Log levels accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "glint")]
#[command(about = "Render the Glint demo scene with a CPU ray tracer")]
pub struct Args {
    /// Output PNG path
    #[arg(short, long, default_value = "glint.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value = "500")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "500")]
    pub height: u32,

    /// Rays per pixel, stratified over the pixel footprint
    #[arg(long, short = 's', default_value = "1")]
    pub samples: u32,

    /// Worker threads (0 renders on the main thread)
    #[arg(long, short = 't')]
    pub threads: Option<usize>,

    /// Progress reporting step in percent (0 disables)
    #[arg(long)]
    pub progress: Option<u32>,

    /// Maximum reflection/refraction depth
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for anti-aliasing and depth-of-field sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Focal distance for depth of field; needs --aperture
    #[arg(long, requires = "aperture")]
    pub focal_length: Option<f32>,

    /// Aperture radius for depth of field
    #[arg(long, requires = "focal_length")]
    pub aperture: Option<f32>,

    /// JSON file with render settings; flags override its values
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Overlay a grid line every N pixels
    #[arg(long)]
    pub grid: Option<u32>,

    /// Logging level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command-line overrides on top of `settings`.
    pub fn apply_overrides(&self, mut settings: RenderSettings) -> RenderSettings {
        if let Some(threads) = self.threads {
            settings.threads = threads;
        }
        if let Some(progress) = self.progress {
            settings.progress_interval = progress;
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = max_depth;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        settings
    }
}
