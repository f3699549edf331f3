//! Perspective ray generation.
//!
//! The camera projects through an image plane one world unit wide sitting
//! at the focal length derived from the vertical field of view. Pixel
//! coordinates map linearly onto that plane, and the camera transform
//! rotates and positions the resulting directions.

use glint_math::{Ray, Transform, Vec3};
use glint_scene::Camera;

/// Resolution-specific ray source derived from a [`Camera`].
pub struct Viewport {
    half_width: f32,
    half_height: f32,
    meter_per_pixel: f32,
    focal_length: f32,
    transform: Transform,
}

impl Viewport {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let plane_height = camera.aspect_ratio.recip();

        Self {
            half_width: width as f32 / 2.0,
            half_height: height as f32 / 2.0,
            meter_per_pixel: plane_height / height as f32,
            focal_length: focal_length(plane_height, camera.y_fov),
            transform: camera.transform,
        }
    }

    /// The primary ray through pixel `(x, y)`.
    pub fn ray_from(&self, x: u32, y: u32) -> Ray {
        let plane_x = (x as f32 - self.half_width) * self.meter_per_pixel;
        let plane_y = (self.half_height - y as f32) * self.meter_per_pixel;

        let direction = Vec3::new(plane_x, plane_y, -self.focal_length).normalize();
        Ray::new(self.transform.translation, self.transform.rotate(direction))
    }
}

fn focal_length(plane_height: f32, y_fov: f32) -> f32 {
    (plane_height / 2.0) / (y_fov / 2.0).tan()
}
