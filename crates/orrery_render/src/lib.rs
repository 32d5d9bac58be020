//! Orrery Rendering Library
//!
//! This crate provides the wgpu-based rendering of the system.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::OrbitCamera`] - Camera orbiting a target point
//! - [`geometry::MeshLibrary`] - GPU buffers for the unit sphere, cube, and dodecahedron
//! - [`pipeline::MeshPipeline`] - Instanced lit meshes (opaque and transparent)
//! - [`pipeline::LinePipeline`] - Field lines
//! - [`pipeline::PointPipeline`] - Dust
//! - [`renderable::RenderableScene`] - Converts the World to per-frame GPU data

pub mod context;
pub mod camera;
pub mod geometry;
pub mod pipeline;
pub mod renderable;

// Re-export core types for convenience
pub use orrery_core::{Entity, EntityKey, Material, MeshKind, Transform3D, World};

pub use renderable::{InstanceBatch, RenderableScene};
