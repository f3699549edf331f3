//! Surface materials and scattering.

use glint_math::{Color, Ray, Vec3};
use rand::{Rng, RngCore};

use crate::hit::Hit;
use crate::world::World;

/// Refractive index of `Glass` surfaces (air to glass).
pub const IOR: f32 = 1.5;

/// Fraction of a diffuse surface's albedo contributed regardless of light
/// visibility.
pub const AMBIENT_FACTOR: f32 = 0.3;

/// Offset applied along outgoing ray directions so the new ray cannot
/// immediately re-intersect the surface it left.
pub const SURFACE_EPSILON: f32 = 1e-3;

/// The result of scattering a ray at a surface.
///
/// An absent outgoing ray is normal path termination, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub ray: Option<Ray>,
    pub color: Color,
}

/// Closed set of surface materials.
///
/// Each variant owns only its own scalar and color state, so materials are
/// cheap to share across triangles and across rendering threads. Scattering
/// is a single `match`, checked exhaustive at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Matte surface shaded by ambient light plus shadow-tested point
    /// lights. Terminates the path.
    Diffuse { albedo: Color },
    /// Mirror reflection, perturbed by roughness. Always scatters.
    Metal { albedo: Color, roughness: f32 },
    /// Dielectric that reflects or refracts, never absorbs.
    Glass { tint: Color },
    /// Pure emitter. Terminates the path with its emission color.
    Emissive { color: Color },
}

impl Material {
    /// Scatter an incoming ray at `hit`.
    ///
    /// Shadow testing happens here rather than in the integrator: `Diffuse`
    /// casts one shadow ray per light through `world` and folds the visible
    /// contributions into its color. The other variants ignore the light
    /// list.
    pub fn scatter(&self, ray: &Ray, hit: &Hit, world: &World, rng: &mut dyn RngCore) -> Scatter {
        match self {
            Material::Diffuse { albedo } => {
                let mut color = *albedo * AMBIENT_FACTOR;

                for light in world.lights() {
                    let light_vec = light.origin - hit.point;
                    let light_distance = light_vec.length();
                    let light_dir = light_vec / light_distance;

                    let shadow_ray =
                        Ray::new(hit.point + light_dir * SURFACE_EPSILON, light_dir);
                    let occluded = world
                        .hits(&shadow_ray)
                        .is_some_and(|occluder| occluder.distance < light_distance);
                    if occluded {
                        continue;
                    }

                    color += *albedo
                        * light_vec.dot(hit.normal).max(0.0)
                        * (1.0 / (light_distance * light_distance))
                        * (light.color * light.intensity);
                }

                Scatter { ray: None, color }
            }
            Material::Metal { albedo, roughness } => {
                let reflected = reflect(ray.direction.normalize(), hit.normal);
                let direction =
                    (reflected + *roughness * random_on_hemisphere(hit.normal, rng)).normalize();
                Scatter {
                    ray: Some(offset_ray(hit.point, direction)),
                    color: *albedo,
                }
            }
            Material::Glass { tint } => {
                let eta = if hit.front_face { 1.0 / IOR } else { IOR };

                let unit_direction = ray.direction.normalize();
                let cos_theta = (-unit_direction).dot(hit.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                // Total internal reflection leaves no refracted branch.
                let cannot_refract = eta * sin_theta > 1.0;
                let direction =
                    if cannot_refract || reflectance(cos_theta, eta) > gen_f32(rng) {
                        reflect(unit_direction, hit.normal)
                    } else {
                        refract(unit_direction, hit.normal, eta)
                    };

                Scatter {
                    ray: Some(offset_ray(hit.point, direction)),
                    color: *tint,
                }
            }
            Material::Emissive { color } => Scatter {
                ray: None,
                color: *color,
            },
        }
    }
}

/// New ray nudged off the surface along its own direction.
fn offset_ray(point: Vec3, direction: Vec3) -> Ray {
    Ray::new(point + direction * SURFACE_EPSILON, direction)
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface with the given index ratio.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f32, eta: f32) -> f32 {
    let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Uniform f32 in [0, 1).
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Random unit vector, uniform on the sphere (rejection sampled).
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Random unit vector in the hemisphere around `normal`.
pub fn random_on_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let v = random_unit_vector(rng);
    if v.dot(normal) > 0.0 {
        v
    } else {
        -v
    }
}
