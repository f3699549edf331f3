use crate::{Quat, Vec3};

/// Rigid transform: a translation paired with a rotation.
///
/// Scene nodes (cameras in particular) carry one of these. Directions are
/// rotated only; points get the translation as well.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Rotate a direction into world space. Translation does not apply.
    #[inline]
    pub fn rotate(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// Transform a point into world space.
    #[inline]
    pub fn apply(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
