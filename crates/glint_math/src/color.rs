use crate::Vec3;

/// Linear RGB color. Channels are nominally in [0, 1]; intermediate light
/// transport results may exceed that until clamped for output.
pub type Color = Vec3;

/// Convert a linear color channel to gamma space (gamma 2).
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp all channels to [0, 1].
pub fn clamp01(color: Color) -> Color {
    color.clamp(Vec3::ZERO, Vec3::ONE)
}

/// Rec. 601 luma, used for edge detection in post-processing.
pub fn luminance(color: Color) -> f32 {
    0.299 * color.x + 0.587 * color.y + 0.114 * color.z
}

/// Convert a color to 8-bit RGB, clamping first.
pub fn to_rgb8(color: Color) -> [u8; 3] {
    let c = clamp01(color);
    let r = (255.0 * c.x) as u8;
    let g = (255.0 * c.y) as u8;
    let b = (255.0 * c.z) as u8;
    [r, g, b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-0.5), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-6);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clamp01() {
        let c = clamp01(Color::new(-1.0, 0.5, 2.0));

        assert_eq!(c, Color::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn test_luminance_weights() {
        assert!((luminance(Color::ONE) - 1.0).abs() < 1e-5);
        assert_eq!(luminance(Color::ZERO), 0.0);
        // Green dominates the luma weighting.
        assert!(luminance(Color::new(0.0, 1.0, 0.0)) > luminance(Color::new(1.0, 0.0, 0.0)));
        assert!(luminance(Color::new(1.0, 0.0, 0.0)) > luminance(Color::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_to_rgb8() {
        assert_eq!(to_rgb8(Color::ZERO), [0, 0, 0]);
        assert_eq!(to_rgb8(Color::ONE), [255, 255, 255]);
        assert_eq!(to_rgb8(Color::new(2.0, -1.0, 0.5)), [255, 0, 127]);
    }
}
