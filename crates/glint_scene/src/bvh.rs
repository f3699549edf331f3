//! Bounding volume hierarchy over the scene's triangle array.
//!
//! Nodes live in one growable arena with the root at index 0. A node is a
//! leaf iff it owns triangles (`tri_count > 0`); an interior node's two
//! children are adjacent at `left_child` and `left_child + 1`. Building
//! partitions the shared triangle array in place, so leaves address it by
//! disjoint index ranges and triangles are never copied per traversal.

use glint_math::{Aabb, Ray};

use crate::hit::Hit;
use crate::triangle::{TriHit, Triangle};

/// Number of evenly spaced candidate split planes tested per axis.
pub const SPLIT_PLANES: u32 = 8;

const ROOT_INDEX: usize = 0;
const TRAVERSAL_STACK_SIZE: usize = 64;

/// One BVH node. Leaf iff `tri_count > 0`.
#[derive(Debug, Copy, Clone)]
pub struct BvhNode {
    pub aabb: Aabb,
    pub left_child: u32,
    pub first_tri: u32,
    pub tri_count: u32,
}

impl BvhNode {
    /// Node over a triangle range, bounds grown over the range's vertices.
    fn new(first_tri: u32, tri_count: u32, triangles: &[Triangle]) -> Self {
        let mut aabb = Aabb::EMPTY;
        let first = first_tri as usize;
        for tri in &triangles[first..first + tri_count as usize] {
            aabb.grow(tri.v0.position);
            aabb.grow(tri.v1.position);
            aabb.grow(tri.v2.position);
        }

        Self {
            aabb,
            left_child: 0,
            first_tri,
            tri_count,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.tri_count > 0
    }
}

/// The hierarchy plus the triangle array it indexes into and owns.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    triangles: Vec<Triangle>,
    split_planes: u32,
}

impl Bvh {
    /// Build with the default split-plane resolution.
    pub fn build(triangles: Vec<Triangle>) -> Self {
        Self::build_with_planes(triangles, SPLIT_PLANES)
    }

    /// Build, testing `split_planes` evenly spaced candidates per axis.
    pub fn build_with_planes(triangles: Vec<Triangle>, split_planes: u32) -> Self {
        let root = BvhNode::new(0, triangles.len() as u32, &triangles);
        let mut bvh = Self {
            nodes: vec![root],
            triangles,
            split_planes: split_planes.max(2),
        };

        if !bvh.triangles.is_empty() {
            bvh.subdivide(ROOT_INDEX);
        }
        log::info!(
            "built bvh: {} nodes over {} triangles",
            bvh.nodes.len(),
            bvh.triangles.len()
        );

        bvh
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// The triangle array in its current (build-permuted) order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Recursively split `node_index` while the SAH cost keeps improving.
    fn subdivide(&mut self, node_index: usize) {
        let node = self.nodes[node_index];

        let mut best_axis = 0;
        let mut best_pos = 0.0;
        let mut best_cost = f32::INFINITY;

        for axis in 0..3 {
            let bounds_min = node.aabb.min[axis];
            let bounds_max = node.aabb.max[axis];
            if bounds_min == bounds_max {
                continue;
            }

            let scale = (bounds_max - bounds_min) / self.split_planes as f32;
            for i in 1..self.split_planes {
                let candidate = bounds_min + i as f32 * scale;
                let cost = self.evaluate_sah(&node, axis, candidate);
                if cost < best_cost {
                    best_axis = axis;
                    best_pos = candidate;
                    best_cost = cost;
                }
            }
        }

        // Splitting must beat the cost of leaving this node a leaf.
        let parent_cost = node.tri_count as f32 * node.aabb.area();
        if best_cost >= parent_cost {
            return;
        }

        // Two-pointer partition of the node's range by centroid.
        let mut i = node.first_tri as usize;
        let mut j = (node.first_tri + node.tri_count - 1) as usize;
        while i <= j {
            if self.triangles[i].centroid[best_axis] < best_pos {
                i += 1;
            } else {
                self.triangles.swap(i, j);
                if j == 0 {
                    break;
                }
                j -= 1;
            }
        }

        // A one-sided partition cannot make progress; keep the leaf.
        let left_count = i as u32 - node.first_tri;
        if left_count == 0 || left_count == node.tri_count {
            return;
        }

        let left_child = self.nodes.len() as u32;
        let left = BvhNode::new(node.first_tri, left_count, &self.triangles);
        let right = BvhNode::new(i as u32, node.tri_count - left_count, &self.triangles);
        self.nodes.push(left);
        self.nodes.push(right);

        let parent = &mut self.nodes[node_index];
        parent.left_child = left_child;
        parent.tri_count = 0;

        self.subdivide(left_child as usize);
        self.subdivide(left_child as usize + 1);
    }

    /// SAH cost of splitting `node` at `pos` on `axis`: each side's triangle
    /// count weighted by its bounds area. An empty side costs infinity.
    fn evaluate_sah(&self, node: &BvhNode, axis: usize, pos: f32) -> f32 {
        let mut left_box = Aabb::EMPTY;
        let mut right_box = Aabb::EMPTY;
        let mut left_count = 0u32;
        let mut right_count = 0u32;

        let first = node.first_tri as usize;
        for tri in &self.triangles[first..first + node.tri_count as usize] {
            if tri.centroid[axis] < pos {
                left_count += 1;
                left_box.grow(tri.v0.position);
                left_box.grow(tri.v1.position);
                left_box.grow(tri.v2.position);
            } else {
                right_count += 1;
                right_box.grow(tri.v0.position);
                right_box.grow(tri.v1.position);
                right_box.grow(tri.v2.position);
            }
        }

        if left_count == 0 || right_count == 0 {
            return f32::INFINITY;
        }

        left_count as f32 * left_box.area() + right_count as f32 * right_box.area()
    }

    /// Nearest hit along `ray`, if any.
    ///
    /// Iterative traversal with an explicit stack of node indices. Children
    /// are visited near first; a child whose box is missed, or whose entry
    /// distance is not closer than the nearest triangle hit so far, is
    /// skipped entirely. Only the raw distance and barycentrics are tracked
    /// inside the loop; the full `Hit` is built once for the winner.
    pub fn intersects(&self, ray: &Ray) -> Option<Hit<'_>> {
        if self.triangles.is_empty() {
            return None;
        }

        let mut stack = [0u32; TRAVERSAL_STACK_SIZE];
        let mut stack_len = 0usize;
        let mut node = self.nodes[ROOT_INDEX];

        let mut nearest_dist = f32::INFINITY;
        let mut nearest: Option<(&Triangle, TriHit)> = None;

        loop {
            if node.is_leaf() {
                let first = node.first_tri as usize;
                for tri in &self.triangles[first..first + node.tri_count as usize] {
                    if let Some(tri_hit) = tri.intersect(ray) {
                        if tri_hit.t < nearest_dist {
                            nearest_dist = tri_hit.t;
                            nearest = Some((tri, tri_hit));
                        }
                    }
                }

                if stack_len == 0 {
                    break;
                }
                stack_len -= 1;
                node = self.nodes[stack[stack_len] as usize];
                continue;
            }

            let left = node.left_child;
            let right = node.left_child + 1;
            let dist_left = self.entry_distance(left, ray, nearest_dist);
            let dist_right = self.entry_distance(right, ray, nearest_dist);

            let (near_dist, near_child, far_dist, far_child) = if dist_left > dist_right {
                (dist_right, right, dist_left, left)
            } else {
                (dist_left, left, dist_right, right)
            };

            if near_dist.is_infinite() {
                // Neither child can beat the current nearest hit.
                if stack_len == 0 {
                    break;
                }
                stack_len -= 1;
                node = self.nodes[stack[stack_len] as usize];
            } else {
                node = self.nodes[near_child as usize];
                if far_dist.is_finite() {
                    stack[stack_len] = far_child;
                    stack_len += 1;
                }
            }
        }

        let (triangle, tri_hit) = nearest?;
        Some(triangle.hit_for(ray, &tri_hit))
    }

    /// Entry distance into a node's box, or infinity when the box is missed
    /// or cannot contain anything nearer than `nearest_dist`.
    fn entry_distance(&self, index: u32, ray: &Ray, nearest_dist: f32) -> f32 {
        match self.nodes[index as usize].aabb.hit(ray) {
            Some(dist) if dist < nearest_dist => dist,
            _ => f32::INFINITY,
        }
    }
}
