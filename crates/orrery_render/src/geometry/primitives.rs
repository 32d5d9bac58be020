//! Unit primitives
//!
//! All primitives are centred on the origin with outward normals and
//! counter-clockwise front faces.

use std::f32::consts::PI;
use orrery_math::Vec3;

use crate::pipeline::MeshVertex;

/// Indexed triangle mesh on the CPU
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Radius-1 UV sphere with `segments` slices and `segments` stacks
///
/// The seam column is duplicated and the poles carry one vertex per slice.
/// The triangles touching each pole are single, not quads.
pub fn sphere(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let columns = segments + 1;
    let mut mesh = MeshData::default();

    for iy in 0..=segments {
        let v = iy as f32 / segments as f32;
        let (sin_v, cos_v) = (v * PI).sin_cos();
        for ix in 0..=segments {
            let u = ix as f32 / segments as f32;
            let (sin_u, cos_u) = (u * 2.0 * PI).sin_cos();
            let p = [-cos_u * sin_v, cos_v, sin_u * sin_v];
            mesh.vertices.push(MeshVertex::new(p, p));
        }
    }

    for iy in 0..segments {
        for ix in 0..segments {
            let a = iy * columns + ix + 1;
            let b = iy * columns + ix;
            let c = (iy + 1) * columns + ix;
            let d = (iy + 1) * columns + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

/// Cube with side 1 and flat faces
pub fn cube() -> MeshData {
    // (normal, u, v) with u × v = normal so corners wind counter-clockwise
    let faces = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (-Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (-Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (-Vec3::Z, Vec3::Y, Vec3::X),
    ];

    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
            let p = normal * 0.5 + u * su + v * sv;
            mesh.vertices.push(MeshVertex::new(p.to_array(), normal.to_array()));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Dodecahedron with circumradius 1 and flat pentagonal faces
pub fn dodecahedron() -> MeshData {
    let phi = (1.0 + 5f32.sqrt()) / 2.0;
    let inv = 1.0 / phi;

    let mut corners = Vec::with_capacity(20);
    for x in [-1.0, 1.0] {
        for y in [-1.0, 1.0] {
            for z in [-1.0, 1.0] {
                corners.push(Vec3::new(x, y, z));
            }
        }
    }
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            corners.push(Vec3::new(0.0, a * inv, b * phi));
            corners.push(Vec3::new(a * inv, b * phi, 0.0));
            corners.push(Vec3::new(a * phi, 0.0, b * inv));
        }
    }
    let corners: Vec<Vec3> = corners.into_iter().map(|c| c.normalized()).collect();

    // Face normals point at the vertices of the dual icosahedron
    let mut normals = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-1.0, 1.0] {
            normals.push(Vec3::new(a, 0.0, b * phi).normalized());
            normals.push(Vec3::new(0.0, a * phi, b).normalized());
            normals.push(Vec3::new(a * phi, b, 0.0).normalized());
        }
    }

    let mut mesh = MeshData::default();
    for normal in normals {
        let nearest = corners
            .iter()
            .map(|c| c.dot(normal))
            .fold(f32::MIN, f32::max);
        let mut face: Vec<Vec3> = corners
            .iter()
            .copied()
            .filter(|c| c.dot(normal) > nearest - 1e-4)
            .collect();

        // Sort counter-clockwise around the normal
        let axis_a = (face[0] - normal * face[0].dot(normal)).normalized();
        let axis_b = normal.cross(axis_a);
        face.sort_by(|p, q| {
            let angle_p = p.dot(axis_b).atan2(p.dot(axis_a));
            let angle_q = q.dot(axis_b).atan2(q.dot(axis_a));
            angle_p.total_cmp(&angle_q)
        });

        let base = mesh.vertices.len() as u32;
        for p in &face {
            mesh.vertices.push(MeshVertex::new(p.to_array(), normal.to_array()));
        }
        for k in 1..face.len() as u32 - 1 {
            mesh.indices.extend_from_slice(&[base, base + k, base + k + 1]);
        }
    }
    mesh
}
