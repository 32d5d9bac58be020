//! Mesh geometry
//!
//! Unit-sized primitives built on the CPU and their GPU buffers.

pub mod primitives;
pub mod library;

pub use primitives::{cube, dodecahedron, sphere, MeshData};
pub use library::{mesh_data, GpuMesh, MeshLibrary};
