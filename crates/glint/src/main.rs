use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glint_render::RenderConfig;
use glint_scene::load_world;

/// CPU path tracer for glTF scenes.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the .gltf scene to render
    scene: PathBuf,

    /// Output image path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Output width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Maximum ray bounce depth
    #[arg(long, default_value_t = 10)]
    max_depth: u32,

    /// Per-bounce attenuation of recursive contributions
    #[arg(long, default_value_t = 0.9)]
    degrading_factor: f32,

    /// Skip the FXAA pass
    #[arg(long)]
    no_fxaa: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = Args::parse();

    log::info!("importing {}", args.scene.display());
    let world = load_world(&args.scene)
        .with_context(|| format!("failed to import {}", args.scene.display()))?;

    let config = RenderConfig {
        width: args.width,
        height: args.height,
        max_depth: args.max_depth,
        degrading_factor: args.degrading_factor,
        fxaa: !args.no_fxaa,
    };

    let start = Instant::now();
    let framebuffer = glint_render::render(&world, &config);
    log::info!("total render time: {}ms", start.elapsed().as_millis());

    let pixels = framebuffer.to_rgb8();
    let image = image::RgbImage::from_raw(framebuffer.width, framebuffer.height, pixels)
        .context("framebuffer size does not match the requested resolution")?;
    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!("wrote {}", args.output.display());

    Ok(())
}
