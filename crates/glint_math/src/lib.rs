// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod color;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use color::{clamp01, linear_to_gamma, luminance, to_rgb8, Color};
pub use ray::Ray;
pub use transform::Transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_vec3() {
        let c: Color = Vec3::new(0.5, 0.25, 1.0);
        assert_eq!(c * 2.0, Vec3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_quat_rotates_vec3() {
        let q = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let v = q * Vec3::new(0.0, 0.0, -1.0);
        assert!((v - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    }
}
