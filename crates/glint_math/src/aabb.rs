use crate::{Ray, Vec3};

/// Axis-aligned bounding box stored as min/max corner points.
///
/// Boxes start [`EMPTY`](Self::EMPTY) and are grown point by point while the
/// BVH is built. During traversal they answer the slab test with the ray's
/// cached inverse direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// The empty box. Its min is +infinity and its max is -infinity, so
    /// growing it by any point yields a box containing exactly that point.
    pub const EMPTY: Self = Self {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a box from explicit corners. `min` must be componentwise less
    /// than or equal to `max` for a non-empty box.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Expand the box to contain `point`.
    #[inline]
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Half the surface area of the box, the metric used for SAH cost
    /// comparisons. The factor of two cancels between candidates.
    #[inline]
    pub fn area(&self) -> f32 {
        let e = self.max - self.min;
        e.x * e.y + e.y * e.z + e.z * e.x
    }

    /// Slab test against `ray`, returning the entry distance on a hit.
    ///
    /// The per-axis near/far distances are folded with min/max, so negative
    /// direction components need no sign branches. The entry distance can be
    /// negative when the ray origin is inside the box; the test accepts
    /// whenever the exit distance is at least `max(entry, 0)`.
    pub fn hit(&self, ray: &Ray) -> Option<f32> {
        let t1 = (self.min - ray.origin) * ray.inv_direction;
        let t2 = (self.max - ray.origin) * ray.inv_direction;
        let t_min = t1.min(t2).max_element();
        let t_max = t1.max(t2).min_element();

        if t_max >= t_min.max(0.0) {
            Some(t_min)
        } else {
            None
        }
    }
}
