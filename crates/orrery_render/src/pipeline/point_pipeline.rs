//! Dust pipeline
//!
//! Points are drawn one pixel wide; point lists have no size in wgpu.

use super::buffer::DynamicBuffer;
use super::line_pipeline::{create_flat_pipeline, FlatPipelineParts};
use super::types::{ColorVertex, FlatUniforms};

/// Render pipeline for point clouds
pub struct PointPipeline {
    parts: FlatPipelineParts,
    vertices: DynamicBuffer,
    uploaded: bool,
}

impl PointPipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            parts: create_flat_pipeline(
                device,
                surface_format,
                wgpu::PrimitiveTopology::PointList,
                "Point Pipeline",
            ),
            vertices: DynamicBuffer::new(
                device,
                "Point Vertex Buffer",
                wgpu::BufferUsages::VERTEX,
                (std::mem::size_of::<ColorVertex>() * 2048) as u64,
            ),
            uploaded: false,
        }
    }

    /// Update uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &FlatUniforms) {
        queue.write_buffer(&self.parts.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload the points
    ///
    /// Dust never moves, so only the first call uploads.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, points: &[ColorVertex]) {
        if self.uploaded {
            return;
        }
        self.vertices.write(device, queue, points);
        self.uploaded = true;
        log::debug!("Uploaded {} dust points", points.len());
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.vertices.is_empty() {
            return;
        }
        pass.set_pipeline(&self.parts.pipeline);
        pass.set_bind_group(0, &self.parts.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        pass.draw(0..self.vertices.len(), 0..1);
    }
}
