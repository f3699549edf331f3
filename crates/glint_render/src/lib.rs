//! glint rendering - CPU path tracing
//!
//! Turns a loaded scene into pixels: perspective ray generation from the
//! scene camera, a depth-limited path tracing loop parallelized over
//! scanlines, and an FXAA pass over the finished frame.

mod fxaa;
mod renderer;
mod viewport;

pub use fxaa::apply_fxaa;
pub use renderer::{render, trace, Framebuffer, RenderConfig};
pub use viewport::Viewport;

/// Re-export common math types from glint_math
pub use glint_math::{Color, Ray, Vec3};
