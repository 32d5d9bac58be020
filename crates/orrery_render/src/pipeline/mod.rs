//! Rendering pipeline components
//!
//! Every pipeline records into a render pass opened by the caller, so a
//! frame is drawn in one pass: opaque meshes, field lines, dust, and last
//! the transparent meshes.

pub mod types;
pub mod buffer;
pub mod mesh_pipeline;
pub mod line_pipeline;
pub mod point_pipeline;

// Re-export types
pub use types::{ColorVertex, FlatUniforms, GpuLight, MeshInstance, MeshVertex, SceneUniforms, MAX_LIGHTS};
pub use buffer::DynamicBuffer;

// Re-export pipelines
pub use mesh_pipeline::{MeshPipeline, DEPTH_FORMAT};
pub use line_pipeline::LinePipeline;
pub use point_pipeline::PointPipeline;
