mod cli;
mod demo;

use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use glint_math::Vec3;
use glint_renderer::{CameraConfig, Color, RenderSettings, Renderer};

fn load_settings(args: &Args) -> Result<RenderSettings> {
    let settings = match &args.settings {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse settings file {}", path.display()))?
        }
        None => RenderSettings::default(),
    };

    Ok(args.apply_overrides(settings))
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting Glint");

    let settings = load_settings(&args)?;
    log::debug!("Render settings: {:?}", settings);

    let start = Instant::now();
    let scene = demo::build_scene().context("Failed to build demo scene")?;
    log::info!("Scene built in {:?}", start.elapsed());

    let mut config = CameraConfig::new()
        .with_location(Vec3::new(0.0, 1.0, 2.0))
        .looking_at(Vec3::new(0.0, 0.0, -5.0), Vec3::Y)
        .context("Failed to aim camera")?
        .with_view_plane(2.0, 2.0 * args.height as f32 / args.width.max(1) as f32)
        .with_distance(1.5)
        .with_resolution(args.width, args.height)
        .with_samples(args.samples);
    if let (Some(focal_length), Some(aperture)) = (args.focal_length, args.aperture) {
        config = config.with_depth_of_field(focal_length, aperture);
    }
    let camera = config.build().context("Invalid camera configuration")?;

    let renderer = Renderer::new(settings);
    let mut image = renderer
        .render_with_progress(&scene, &camera, |progress| {
            log::debug!("{}/{} pixels", progress.done, progress.total);
        })
        .context("Render failed")?;

    if let Some(interval) = args.grid {
        image.print_grid(interval, Color::ONE);
    }

    let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8())
        .context("Image buffer size does not match its dimensions")?;
    rgb.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}
