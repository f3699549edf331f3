//! Triangle geometry and Möller-Trumbore intersection.

use std::sync::Arc;

use glint_math::{Ray, Vec2, Vec3};

use crate::hit::Hit;
use crate::material::Material;

/// Rejection threshold for near-parallel rays and near-zero hit distances.
const INTERSECT_EPSILON: f32 = 1e-7;

/// A mesh vertex: position, unit normal, optional texture coordinate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Option<Vec2>,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Option<Vec2>) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// The raw result of a ray/triangle intersection: distance along the ray
/// plus the barycentric coordinates of the intersection point.
///
/// Traversal keeps only the nearest of these and defers building the full
/// [`Hit`] until the winner is known.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

/// A triangle with per-vertex attributes and a shared material.
///
/// The centroid is precomputed once; the BVH builder partitions triangles
/// by centroid and never recomputes it.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub v0: Vertex,
    pub v1: Vertex,
    pub v2: Vertex,
    pub centroid: Vec3,
    material: Arc<Material>,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex, material: Arc<Material>) -> Self {
        let centroid = (v0.position + v1.position + v2.position) / 3.0;
        Self {
            v0,
            v1,
            v2,
            centroid,
            material,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Möller-Trumbore ray/triangle intersection.
    ///
    /// Returns the distance and barycentric coordinates, or `None` when the
    /// ray is parallel to the triangle plane, the intersection lies outside
    /// the triangle, or the hit is behind (or too close to) the origin.
    pub fn intersect(&self, ray: &Ray) -> Option<TriHit> {
        let edge1 = self.v1.position - self.v0.position;
        let edge2 = self.v2.position - self.v0.position;

        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);
        if det > -INTERSECT_EPSILON && det < INTERSECT_EPSILON {
            return None; // ray parallel to the triangle plane
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.v0.position;

        let u = inv_det * s.dot(h);
        if u < 0.0 || u > 1.0 {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        if t <= INTERSECT_EPSILON {
            return None; // behind or touching the origin
        }

        Some(TriHit { t, u, v })
    }

    /// Build the full [`Hit`] for a raw intersection result.
    ///
    /// Normal and UV are interpolated with the barycentric weights. When the
    /// interpolated normal faces along the ray the hit is marked back-facing
    /// and the normal is flipped to oppose the ray.
    pub fn hit_for(&self, ray: &Ray, tri_hit: &TriHit) -> Hit<'_> {
        let TriHit { t, u, v } = *tri_hit;
        let w = 1.0 - u - v;

        let normal = (self.v0.normal * w + self.v1.normal * u + self.v2.normal * v).normalize();
        let uv = match (self.v0.uv, self.v1.uv, self.v2.uv) {
            (Some(uv0), Some(uv1), Some(uv2)) => Some(uv0 * w + uv1 * u + uv2 * v),
            _ => None,
        };

        let front_face = ray.direction.dot(normal) < 0.0;
        let normal = if front_face { normal } else { -normal };

        Hit {
            distance: t,
            point: ray.at(t),
            normal,
            uv,
            front_face,
            material: self.material.as_ref(),
        }
    }
}
