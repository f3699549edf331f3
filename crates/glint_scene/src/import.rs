//! glTF scene import.
//!
//! Loads triangles, point lights and the camera from a glTF 2.0 file and
//! assembles them into a [`World`]. Materials are classified from the glTF
//! PBR factors: an emissive factor wins, then a transmission factor
//! (`KHR_materials_transmission`) makes glass, then a metallic factor of
//! one makes metal, and everything else is diffuse.

use std::path::Path;
use std::sync::Arc;

use glint_math::{Quat, Transform, Vec2, Vec3};
use gltf::khr_lights_punctual::Kind;
use gltf::mesh::Mode;
use thiserror::Error;

use crate::camera::{Camera, DEFAULT_ASPECT_RATIO};
use crate::light::Light;
use crate::material::Material;
use crate::triangle::{Triangle, Vertex};
use crate::world::World;

/// Light used when the scene does not bring its own.
const DEFAULT_LIGHT: Light = Light {
    origin: Vec3::new(-2.5, 3.0, 2.0),
    color: Vec3::ONE,
    intensity: 1.0,
};

/// Errors that can occur during glTF import.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Mesh '{mesh}' is missing the {attribute} attribute")]
    MissingAttribute { mesh: String, attribute: &'static str },

    #[error("Mesh '{mesh}' has a primitive without a material")]
    MissingMaterial { mesh: String },

    #[error("Mesh '{mesh}' has mismatched or out-of-range vertex data")]
    InvalidPrimitive { mesh: String },

    #[error("No perspective camera found in the scene")]
    NoCamera,
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Load a glTF file and return the ready-to-render [`World`].
///
/// # Example
///
/// ```ignore
/// use glint_scene::load_world;
///
/// let world = load_world("scene.gltf")?;
/// ```
pub fn load_world(path: impl AsRef<Path>) -> ImportResult<World> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path)?;

    let mut triangles = Vec::new();
    let mut lights = Vec::new();
    let mut camera = None;

    for node in document.nodes() {
        if let Some(mesh) = node.mesh() {
            load_mesh(&mesh, &buffers, &mut triangles)?;
        }
        if let Some(light) = node.light() {
            if let Some(light) = light_from_node(&node, &light) {
                lights.push(light);
            }
        }
        if camera.is_none() {
            camera = camera_from_node(&node);
        }
    }

    let camera = camera.ok_or(ImportError::NoCamera)?;
    if lights.is_empty() {
        log::warn!("no point lights in scene, using the default light");
        lights.push(DEFAULT_LIGHT);
    }
    log::info!(
        "imported {} triangles and {} lights from {}",
        triangles.len(),
        lights.len(),
        path.display()
    );

    Ok(World::new(triangles, lights, camera))
}

/// Append every triangle of `mesh` to `triangles`.
fn load_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    triangles: &mut Vec<Triangle>,
) -> ImportResult<()> {
    let mesh_name = mesh.name().unwrap_or("unnamed").to_owned();

    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            log::warn!("skipping non-triangle primitive in mesh '{mesh_name}'");
            continue;
        }
        let material = Arc::new(material_from_factors(&primitive.material(), &mesh_name)?);
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .ok_or_else(|| ImportError::MissingAttribute {
                mesh: mesh_name.clone(),
                attribute: "POSITION",
            })?
            .map(Vec3::from)
            .collect();
        let normals: Vec<Vec3> = reader
            .read_normals()
            .ok_or_else(|| ImportError::MissingAttribute {
                mesh: mesh_name.clone(),
                attribute: "NORMAL",
            })?
            .map(Vec3::from)
            .collect();
        let uvs: Option<Vec<Vec2>> = reader
            .read_tex_coords(0)
            .map(|coords| coords.into_f32().map(Vec2::from).collect());

        if normals.len() != positions.len() {
            return Err(ImportError::InvalidPrimitive {
                mesh: mesh_name.clone(),
            });
        }
        if let Some(uvs) = &uvs {
            if uvs.len() != positions.len() {
                return Err(ImportError::InvalidPrimitive {
                    mesh: mesh_name.clone(),
                });
            }
        }

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let vertex = |index: u32| -> ImportResult<Vertex> {
            let index = index as usize;
            let position = *positions
                .get(index)
                .ok_or_else(|| ImportError::InvalidPrimitive {
                    mesh: mesh_name.clone(),
                })?;
            let uv = uvs.as_ref().map(|uvs| uvs[index]);
            Ok(Vertex::new(position, normals[index], uv))
        };

        for corner in indices.chunks_exact(3) {
            triangles.push(Triangle::new(
                vertex(corner[0])?,
                vertex(corner[1])?,
                vertex(corner[2])?,
                Arc::clone(&material),
            ));
        }
    }

    Ok(())
}

/// Classify a glTF material into one of the renderer's materials.
fn material_from_factors(
    material: &gltf::Material,
    mesh_name: &str,
) -> ImportResult<Material> {
    if material.index().is_none() {
        return Err(ImportError::MissingMaterial {
            mesh: mesh_name.to_owned(),
        });
    }

    let emissive = Vec3::from(material.emissive_factor());
    if emissive != Vec3::ZERO {
        return Ok(Material::Emissive { color: emissive });
    }

    let pbr = material.pbr_metallic_roughness();
    let base = pbr.base_color_factor();
    let albedo = Vec3::new(base[0], base[1], base[2]);

    if let Some(transmission) = material.transmission() {
        if transmission.transmission_factor() > 0.0 {
            return Ok(Material::Glass { tint: albedo });
        }
    }

    if pbr.metallic_factor() >= 1.0 {
        return Ok(Material::Metal {
            albedo,
            roughness: pbr.roughness_factor(),
        });
    }

    Ok(Material::Diffuse { albedo })
}

/// Point light at the node's translation. Other light kinds are skipped.
fn light_from_node(node: &gltf::Node, light: &gltf::khr_lights_punctual::Light) -> Option<Light> {
    let name = node.name().unwrap_or("unnamed");
    match light.kind() {
        Kind::Point => {
            let (translation, _, _) = node.transform().decomposed();
            Some(Light::new(
                Vec3::from(translation),
                Vec3::from(light.color()),
                light.intensity(),
            ))
        }
        Kind::Directional => {
            log::warn!("skipping directional light on node '{name}'");
            None
        }
        Kind::Spot { .. } => {
            log::warn!("skipping spot light on node '{name}'");
            None
        }
    }
}

/// Camera from a node carrying a perspective projection, if it has one.
fn camera_from_node(node: &gltf::Node) -> Option<Camera> {
    let camera = node.camera()?;
    match camera.projection() {
        gltf::camera::Projection::Perspective(perspective) => {
            let (translation, rotation, _scale) = node.transform().decomposed();
            Some(Camera::new(
                perspective.aspect_ratio().unwrap_or(DEFAULT_ASPECT_RATIO),
                perspective.yfov(),
                Transform::new(Vec3::from(translation), Quat::from_array(rotation)),
            ))
        }
        gltf::camera::Projection::Orthographic(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::Ray;
    use std::fs;
    use std::path::PathBuf;

    const TRIANGLE_SCENE: &str = r#"{
  "asset": {"version": "2.0"},
  "extensionsUsed": ["KHR_lights_punctual"],
  "extensions": {
    "KHR_lights_punctual": {
      "lights": [{"type": "point", "color": [1.0, 0.9, 0.8], "intensity": 2.0}]
    }
  },
  "scene": 0,
  "scenes": [{"nodes": [0, 1, 2]}],
  "nodes": [
    {"mesh": 0},
    {"camera": 0, "translation": [0.0, 0.0, 3.0]},
    {
      "translation": [1.0, 2.0, 3.0],
      "extensions": {"KHR_lights_punctual": {"light": 0}}
    }
  ],
  "cameras": [{"type": "perspective", "perspective": {"yfov": 0.5, "znear": 0.01}}],
  "meshes": [{
    "name": "tri",
    "primitives": [{"attributes": {"POSITION": 0, "NORMAL": 1}, "material": 0}]
  }],
  "materials": [{
    "pbrMetallicRoughness": {
      "baseColorFactor": [0.8, 0.2, 0.2, 1.0],
      "metallicFactor": 0.0
    }
  }],
  "buffers": [{"uri": "tri.bin", "byteLength": 72}],
  "bufferViews": [
    {"buffer": 0, "byteOffset": 0, "byteLength": 36},
    {"buffer": 0, "byteOffset": 36, "byteLength": 36}
  ],
  "accessors": [
    {
      "bufferView": 0,
      "componentType": 5126,
      "count": 3,
      "type": "VEC3",
      "min": [-1.0, -1.0, 0.0],
      "max": [1.0, 1.0, 0.0]
    },
    {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"}
  ]
}"#;

    /// Four copies of the same triangle, one per material variant.
    const MATERIAL_SCENE: &str = r#"{
  "asset": {"version": "2.0"},
  "extensionsUsed": ["KHR_materials_transmission"],
  "scene": 0,
  "scenes": [{"nodes": [0, 1]}],
  "nodes": [{"mesh": 0}, {"camera": 0}],
  "cameras": [{"type": "perspective", "perspective": {"yfov": 0.5, "znear": 0.01}}],
  "meshes": [{
    "name": "variants",
    "primitives": [
      {"attributes": {"POSITION": 0, "NORMAL": 1}, "material": 0},
      {"attributes": {"POSITION": 0, "NORMAL": 1}, "material": 1},
      {"attributes": {"POSITION": 0, "NORMAL": 1}, "material": 2},
      {"attributes": {"POSITION": 0, "NORMAL": 1}, "material": 3}
    ]
  }],
  "materials": [
    {"pbrMetallicRoughness": {"baseColorFactor": [0.7, 0.6, 0.5, 1.0], "metallicFactor": 0.0}},
    {"pbrMetallicRoughness": {
      "baseColorFactor": [0.9, 0.9, 0.9, 1.0],
      "metallicFactor": 1.0,
      "roughnessFactor": 0.25
    }},
    {
      "pbrMetallicRoughness": {"baseColorFactor": [0.8, 1.0, 0.9, 1.0], "metallicFactor": 0.0},
      "extensions": {"KHR_materials_transmission": {"transmissionFactor": 0.9}}
    },
    {"emissiveFactor": [1.0, 0.5, 0.25]}
  ],
  "buffers": [{"uri": "tri.bin", "byteLength": 72}],
  "bufferViews": [
    {"buffer": 0, "byteOffset": 0, "byteLength": 36},
    {"buffer": 0, "byteOffset": 36, "byteLength": 36}
  ],
  "accessors": [
    {
      "bufferView": 0,
      "componentType": 5126,
      "count": 3,
      "type": "VEC3",
      "min": [-1.0, -1.0, 0.0],
      "max": [1.0, 1.0, 0.0]
    },
    {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"}
  ]
}"#;

    /// One triangle in the z = 0 plane plus matching +z normals, as raw
    /// little-endian floats for the scene's buffer.
    fn triangle_buffer() -> Vec<u8> {
        let mut bytes = Vec::with_capacity(72);
        let positions = [[-1.0f32, -1.0, 0.0], [1.0, -1.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = [[0.0f32, 0.0, 1.0]; 3];
        for vertex in positions.iter().chain(normals.iter()) {
            for component in vertex {
                bytes.extend_from_slice(&component.to_le_bytes());
            }
        }
        bytes
    }

    fn write_scene(dir_name: &str, gltf_json: &str, with_buffer: bool) -> PathBuf {
        let dir = std::env::temp_dir().join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        if with_buffer {
            fs::write(dir.join("tri.bin"), triangle_buffer()).unwrap();
        }
        let path = dir.join("scene.gltf");
        fs::write(&path, gltf_json).unwrap();
        path
    }

    #[test]
    fn test_load_world_from_gltf() {
        let path = write_scene("glint_import_full", TRIANGLE_SCENE, true);
        let world = load_world(&path).unwrap();

        assert_eq!(world.bvh().triangles().len(), 1);
        let triangle = &world.bvh().triangles()[0];
        match triangle.material() {
            Material::Diffuse { albedo } => {
                assert!((*albedo - Vec3::new(0.8, 0.2, 0.2)).length() < 1e-6);
            }
            other => panic!("expected a diffuse material, got {other:?}"),
        }

        assert_eq!(world.lights().len(), 1);
        let light = world.lights()[0];
        assert_eq!(light.origin, Vec3::new(1.0, 2.0, 3.0));
        assert!((light.intensity - 2.0).abs() < 1e-6);
        assert!((light.color - Vec3::new(1.0, 0.9, 0.8)).length() < 1e-6);

        let camera = world.camera();
        assert!((camera.y_fov - 0.5).abs() < 1e-6);
        assert!((camera.aspect_ratio - DEFAULT_ASPECT_RATIO).abs() < 1e-6);
        assert_eq!(camera.transform.translation, Vec3::new(0.0, 0.0, 3.0));

        // The imported triangle is live in the BVH.
        let hit = world
            .hits(&Ray::new(Vec3::new(0.0, 0.0, 3.0), -Vec3::Z))
            .expect("camera ray should hit the triangle");
        assert!((hit.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_material_classification_precedence() {
        let path = write_scene("glint_import_materials", MATERIAL_SCENE, true);
        let world = load_world(&path).unwrap();

        // Identical geometry gives every primitive the same centroid, so
        // the build cannot reorder them and they stay in material order.
        let triangles = world.bvh().triangles();
        assert_eq!(triangles.len(), 4);

        match triangles[0].material() {
            Material::Diffuse { albedo } => {
                assert!((*albedo - Vec3::new(0.7, 0.6, 0.5)).length() < 1e-6);
            }
            other => panic!("expected diffuse, got {other:?}"),
        }
        match triangles[1].material() {
            Material::Metal { albedo, roughness } => {
                assert!((*albedo - Vec3::splat(0.9)).length() < 1e-6);
                assert!((*roughness - 0.25).abs() < 1e-6);
            }
            other => panic!("expected metal, got {other:?}"),
        }
        match triangles[2].material() {
            Material::Glass { tint } => {
                assert!((*tint - Vec3::new(0.8, 1.0, 0.9)).length() < 1e-6);
            }
            other => panic!("expected glass, got {other:?}"),
        }
        match triangles[3].material() {
            Material::Emissive { color } => {
                assert!((*color - Vec3::new(1.0, 0.5, 0.25)).length() < 1e-6);
            }
            other => panic!("expected emissive, got {other:?}"),
        }

        // No lights in the scene, so the default fills in.
        assert_eq!(world.lights().len(), 1);
        assert_eq!(world.lights()[0], DEFAULT_LIGHT);
    }

    #[test]
    fn test_scene_without_camera_is_rejected() {
        let empty = r#"{"asset": {"version": "2.0"}, "scene": 0, "scenes": [{"nodes": []}]}"#;
        let path = write_scene("glint_import_nocam", empty, false);

        let err = load_world(&path).map(|_| ()).unwrap_err();
        assert!(matches!(err, ImportError::NoCamera), "got {err:?}");
    }
}
