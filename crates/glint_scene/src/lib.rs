//! Scene data and acceleration for the glint path tracer.
//!
//! A scene is a flat triangle array wrapped in a BVH, a list of point
//! lights and one camera, all imported from glTF. The BVH permutes the
//! triangle array in place while building and answers nearest-hit queries
//! during rendering.

mod bvh;
mod camera;
mod hit;
mod import;
mod light;
mod material;
mod triangle;
mod world;

pub use bvh::{Bvh, BvhNode, SPLIT_PLANES};
pub use camera::Camera;
pub use hit::Hit;
pub use import::{load_world, ImportError, ImportResult};
pub use light::Light;
pub use material::{
    gen_f32, random_on_hemisphere, random_unit_vector, Material, Scatter, AMBIENT_FACTOR, IOR,
    SURFACE_EPSILON,
};
pub use triangle::{TriHit, Triangle, Vertex};
pub use world::World;

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Color, Ray, Transform, Vec2, Vec3};
