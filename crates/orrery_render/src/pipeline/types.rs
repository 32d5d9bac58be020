//! GPU-compatible data types
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use orrery_core::{rgb_from_hex, Lighting, Material};
use orrery_math::{mat4, Mat4, Vec3};

/// Maximum number of directional and point lights in the uniforms
pub const MAX_LIGHTS: usize = 4;

/// A mesh vertex with position and normal
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Per-instance data for the mesh pipeline
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MeshInstance {
    /// Model matrix (64 bytes)
    pub model: [[f32; 4]; 4],
    /// Base color RGBA (16 bytes)
    pub color: [f32; 4],
    /// Emissive radiance RGB + padding (16 bytes)
    pub emissive: [f32; 4],
    /// roughness, metalness, unlit (0 or 1), opacity (16 bytes)
    pub params: [f32; 4],
}

impl MeshInstance {
    /// Build an instance from a model matrix and a material
    pub fn new(model: Mat4, material: &Material) -> Self {
        let [er, eg, eb] = material.emissive_radiance();
        Self {
            model,
            color: material.base_color,
            emissive: [er, eg, eb, 0.0],
            params: [
                material.roughness,
                material.metalness,
                if material.unlit { 1.0 } else { 0.0 },
                material.opacity,
            ],
        }
    }
}

/// A vertex with a flat color, used for lines and points
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    pub fn new(position: Vec3, color: [f32; 3]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

/// A light as seen by the shader
///
/// `position.w` is 0 for a directional light (xyz points towards the light)
/// and 1 for a point light.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 4],
    /// Color premultiplied by intensity + padding
    pub color: [f32; 4],
}

impl GpuLight {
    pub fn directional(towards_light: Vec3, color: u32, intensity: f32) -> Self {
        let d = towards_light.normalized();
        Self {
            position: [d.x, d.y, d.z, 0.0],
            color: scaled_color(color, intensity),
        }
    }

    pub fn point(position: Vec3, color: u32, intensity: f32) -> Self {
        Self {
            position: [position.x, position.y, position.z, 1.0],
            color: scaled_color(color, intensity),
        }
    }
}

fn scaled_color(hex: u32, intensity: f32) -> [f32; 4] {
    let [r, g, b] = rgb_from_hex(hex);
    [r * intensity, g * intensity, b * intensity, 0.0]
}

/// Uniforms for the mesh pass
/// Layout: 240 bytes total (must match mesh.wgsl SceneUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    /// Projection * view (64 bytes)
    pub view_proj: [[f32; 4]; 4],
    /// Camera position + padding (16 bytes)
    pub camera_position: [f32; 4],
    /// Ambient color premultiplied by intensity + padding (16 bytes)
    pub ambient: [f32; 4],
    /// Lights (MAX_LIGHTS * 32 bytes)
    pub lights: [GpuLight; MAX_LIGHTS],
    /// Number of valid entries in `lights` + padding (16 bytes)
    pub light_count: u32,
    pub _padding: [u32; 3],
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: mat4::IDENTITY,
            camera_position: [0.0; 4],
            ambient: [0.0; 4],
            lights: [GpuLight::default(); MAX_LIGHTS],
            light_count: 0,
            _padding: [0; 3],
        }
    }
}

impl SceneUniforms {
    /// Pack the scene lights and camera into uniforms
    ///
    /// Lights past `MAX_LIGHTS` are dropped with a warning.
    pub fn new(view_proj: Mat4, camera_position: Vec3, lighting: &Lighting) -> Self {
        let mut uniforms = Self {
            view_proj,
            camera_position: [camera_position.x, camera_position.y, camera_position.z, 1.0],
            ambient: scaled_color(lighting.ambient_color, lighting.ambient_intensity),
            ..Self::default()
        };

        let lights = lighting
            .directional
            .iter()
            .map(|d| GpuLight::directional(d.position, d.color, d.intensity))
            .chain(
                lighting
                    .points
                    .iter()
                    .map(|p| GpuLight::point(p.position, p.color, p.intensity)),
            );

        for light in lights {
            if uniforms.light_count as usize == MAX_LIGHTS {
                log::warn!("more than {} lights in scene, extra lights ignored", MAX_LIGHTS);
                break;
            }
            uniforms.lights[uniforms.light_count as usize] = light;
            uniforms.light_count += 1;
        }

        uniforms
    }
}

/// Uniforms for the line and point passes (must match flat.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FlatUniforms {
    pub view_proj: [[f32; 4]; 4],
}

impl Default for FlatUniforms {
    fn default() -> Self {
        Self {
            view_proj: mat4::IDENTITY,
        }
    }
}
