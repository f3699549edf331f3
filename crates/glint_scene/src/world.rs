use glint_math::Ray;

use crate::bvh::Bvh;
use crate::camera::Camera;
use crate::hit::Hit;
use crate::light::Light;
use crate::triangle::Triangle;

/// Everything a render needs: the accelerated geometry, the point lights,
/// and the camera the scene was authored with.
pub struct World {
    bvh: Bvh,
    lights: Vec<Light>,
    camera: Camera,
}

impl World {
    /// Build the acceleration structure over `triangles` and take ownership
    /// of the rest of the scene.
    pub fn new(triangles: Vec<Triangle>, lights: Vec<Light>, camera: Camera) -> Self {
        Self {
            bvh: Bvh::build(triangles),
            lights,
            camera,
        }
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Nearest surface along `ray`, if any.
    pub fn hits(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.bvh.intersects(ray)
    }
}
