use crate::Vec3;

/// A ray in 3D space with origin and direction.
///
/// The componentwise reciprocal of the direction is computed once at
/// construction so that repeated bounding-box slab tests avoid per-axis
/// divisions. Rays are immutable after construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    ///
    /// The direction is stored as given; callers that need unit directions
    /// normalize before constructing. Zero direction components yield
    /// infinite reciprocals, which the slab test handles.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.5), Vec3::new(2.5, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_inv_direction_cached() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(2.0, -4.0, 0.5));

        assert_eq!(ray.inv_direction, Vec3::new(0.5, -0.25, 2.0));
    }

    #[test]
    fn test_inv_direction_axis_aligned() {
        // A zero component must become an infinite reciprocal, not a panic.
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);

        assert_eq!(ray.inv_direction.y, 1.0);
        assert!(ray.inv_direction.x.is_infinite());
        assert!(ray.inv_direction.z.is_infinite());
    }
}
