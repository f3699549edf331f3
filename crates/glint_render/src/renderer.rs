//! Core path tracing loop.
//!
//! `trace` follows one ray through the world, letting materials decide
//! whether the path continues. `render` drives it over every pixel with
//! one parallel task per scanline; the scene is immutable during
//! rendering, so rows share it freely and each task writes only its own
//! row of the framebuffer.

use glint_math::{clamp01, linear_to_gamma, to_rgb8, Color, Ray};
use glint_scene::World;
use rand::RngCore;
use rayon::prelude::*;

use crate::fxaa::apply_fxaa;
use crate::viewport::Viewport;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Per-bounce attenuation of recursive contributions
    pub degrading_factor: f32,
    /// Whether to run FXAA over the finished frame
    pub fxaa: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            max_depth: 10,
            degrading_factor: 0.9,
            fxaa: true,
        }
    }
}

/// Compute the color seen by a ray.
///
/// Materials either terminate the path with a final color or return an
/// outgoing ray to follow. Contributions gathered by deeper bounces are
/// attenuated by `degrading_factor` once per bounce already taken.
pub fn trace(
    ray: &Ray,
    world: &World,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    let hit = match world.hits(ray) {
        Some(hit) => hit,
        None => return Color::ZERO,
    };

    let scatter = hit.material.scatter(ray, &hit, world, rng);
    match scatter.ray {
        Some(bounce) => {
            let bounced = trace(&bounce, world, depth - 1, config, rng);
            let falloff = config
                .degrading_factor
                .powi(config.max_depth.saturating_sub(depth) as i32);
            scatter.color * (bounced * falloff)
        }
        None => scatter.color,
    }
}

/// Render target holding gamma-corrected colors, row-major.
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Flatten to 8-bit RGB bytes for encoding.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            bytes.extend_from_slice(&to_rgb8(*pixel));
        }
        bytes
    }
}

/// Render the world into a framebuffer, one parallel task per scanline.
pub fn render(world: &World, config: &RenderConfig) -> Framebuffer {
    let mut framebuffer = Framebuffer::new(config.width, config.height);
    if config.width == 0 || config.height == 0 {
        return framebuffer;
    }
    let viewport = Viewport::new(world.camera(), config.width, config.height);

    log::debug!(
        "rendering {}x{} at depth {}",
        config.width,
        config.height,
        config.max_depth
    );

    framebuffer
        .pixels
        .par_chunks_mut(config.width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = rand::thread_rng();
            for (x, pixel) in row.iter_mut().enumerate() {
                let ray = viewport.ray_from(x as u32, y as u32);
                let color = clamp01(trace(&ray, world, config.max_depth, config, &mut rng));
                *pixel = Color::new(
                    linear_to_gamma(color.x),
                    linear_to_gamma(color.y),
                    linear_to_gamma(color.z),
                );
            }
        });

    if config.fxaa {
        framebuffer = apply_fxaa(&framebuffer);
    }
    framebuffer
}
