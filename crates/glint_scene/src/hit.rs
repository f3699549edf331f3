use glint_math::{Vec2, Vec3};

use crate::material::Material;

/// A resolved intersection: where a ray met the scene and what it met.
///
/// Built once per query for the winning triangle only. The normal always
/// opposes the incoming ray; `front_face` records which side was struck so
/// dielectrics can pick the right refractive index ratio. The material is
/// borrowed from the intersected triangle.
#[derive(Debug, Copy, Clone)]
pub struct Hit<'a> {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
    pub uv: Option<Vec2>,
    pub front_face: bool,
    pub material: &'a Material,
}
