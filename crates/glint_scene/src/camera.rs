use glint_math::Transform;

/// Default aspect ratio when the scene camera does not specify one.
pub const DEFAULT_ASPECT_RATIO: f32 = 1920.0 / 1080.0;

/// Default vertical field of view in radians.
pub const DEFAULT_Y_FOV: f32 = 0.4;

/// A perspective camera as imported from the scene.
///
/// This is the raw description only; resolution-dependent ray generation
/// lives with the renderer, which prepares a viewport from it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub aspect_ratio: f32,
    pub y_fov: f32,
    pub transform: Transform,
}

impl Camera {
    pub fn new(aspect_ratio: f32, y_fov: f32, transform: Transform) -> Self {
        Self {
            aspect_ratio,
            y_fov,
            transform,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            y_fov: DEFAULT_Y_FOV,
            transform: Transform::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();

        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        assert!((camera.y_fov - 0.4).abs() < 1e-6);
        assert_eq!(camera.transform, Transform::IDENTITY);
    }
}
