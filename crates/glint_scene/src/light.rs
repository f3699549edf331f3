use glint_math::{Color, Vec3};

/// A point light: position, color and a linear intensity scale.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    pub origin: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    pub fn new(origin: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            origin,
            color,
            intensity,
        }
    }
}
