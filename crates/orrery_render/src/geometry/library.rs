//! GPU mesh buffers keyed by mesh kind

use std::collections::HashMap;
use orrery_core::MeshKind;
use wgpu::util::DeviceExt;

use super::primitives::{cube, dodecahedron, sphere, MeshData};

/// Vertex and index buffers of one uploaded mesh
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload a CPU mesh
    pub fn upload(device: &wgpu::Device, label: &str, data: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Build the CPU mesh for a mesh kind
pub fn mesh_data(kind: MeshKind) -> MeshData {
    match kind {
        MeshKind::Sphere { segments } => sphere(segments),
        MeshKind::Cube => cube(),
        MeshKind::Dodecahedron => dodecahedron(),
    }
}

/// Meshes uploaded on first use
///
/// Spheres with different segment counts are separate meshes.
#[derive(Default)]
pub struct MeshLibrary {
    meshes: HashMap<MeshKind, GpuMesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload the mesh for `kind` if it is not there yet
    pub fn ensure(&mut self, device: &wgpu::Device, kind: MeshKind) {
        self.meshes.entry(kind).or_insert_with(|| {
            let data = mesh_data(kind);
            log::debug!(
                "Uploading {:?}: {} vertices, {} triangles",
                kind,
                data.vertices.len(),
                data.triangle_count()
            );
            GpuMesh::upload(device, &format!("{:?}", kind), &data)
        });
    }

    pub fn get(&self, kind: MeshKind) -> Option<&GpuMesh> {
        self.meshes.get(&kind)
    }

    /// Number of uploaded meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
