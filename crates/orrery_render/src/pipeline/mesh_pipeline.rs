//! Instanced mesh pipeline
//!
//! Draws every body as an instance of one of the unit meshes, lit by the
//! scene lights. Opaque instances write depth; transparent instances are
//! blended afterwards without writing depth.

use std::ops::Range;
use orrery_core::MeshKind;
use wgpu::util::DeviceExt;

use super::buffer::DynamicBuffer;
use super::types::{MeshInstance, MeshVertex, SceneUniforms};
use crate::geometry::MeshLibrary;
use crate::renderable::InstanceBatch;

/// Depth buffer format shared by every pipeline
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Instance range of one mesh kind in the instance buffer
struct DrawRange {
    mesh: MeshKind,
    instances: Range<u32>,
}

/// Render pipeline for instanced meshes
pub struct MeshPipeline {
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instances: DynamicBuffer,
    opaque_ranges: Vec<DrawRange>,
    transparent_ranges: Vec<DrawRange>,
    /// Depth texture
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl MeshPipeline {
    /// Create a new mesh pipeline
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mesh.wgsl").into()),
        });

        let opaque_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "Opaque Mesh Pipeline",
            wgpu::BlendState::REPLACE,
            true,
        );
        let transparent_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "Transparent Mesh Pipeline",
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let instances = DynamicBuffer::new(
            device,
            "Mesh Instance Buffer",
            wgpu::BufferUsages::VERTEX,
            (std::mem::size_of::<MeshInstance>() * 4096) as u64,
        );

        Self {
            opaque_pipeline,
            transparent_pipeline,
            uniform_buffer,
            bind_group,
            instances,
            opaque_ranges: Vec::new(),
            transparent_ranges: Vec::new(),
            depth_texture: None,
            depth_size: (0, 0),
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        label: &str,
        blend: wgpu::BlendState,
        depth_write_enabled: bool,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Self::vertex_buffer_layout(), Self::instance_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    /// Get the vertex buffer layout for MeshVertex
    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                // normal: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        }
    }

    /// Get the instance buffer layout for MeshInstance
    fn instance_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                // model matrix columns
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 0, shader_location: 2 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 16, shader_location: 3 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 32, shader_location: 4 },
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 48, shader_location: 5 },
                // color
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 64, shader_location: 6 },
                // emissive
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 80, shader_location: 7 },
                // roughness, metalness, unlit, opacity
                wgpu::VertexAttribute { format: wgpu::VertexFormat::Float32x4, offset: 96, shader_location: 8 },
            ],
        }
    }

    /// Update uniforms
    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload this frame's instances and make sure their meshes exist
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        library: &mut MeshLibrary,
        opaque: &[InstanceBatch],
        transparent: &[InstanceBatch],
    ) {
        let total: usize = opaque.iter().chain(transparent).map(|b| b.instances.len()).sum();
        let mut all = Vec::with_capacity(total);

        self.opaque_ranges = Self::append_batches(&mut all, opaque);
        self.transparent_ranges = Self::append_batches(&mut all, transparent);

        for batch in opaque.iter().chain(transparent) {
            library.ensure(device, batch.mesh);
        }

        self.instances.write(device, queue, &all);
    }

    fn append_batches(all: &mut Vec<MeshInstance>, batches: &[InstanceBatch]) -> Vec<DrawRange> {
        batches
            .iter()
            .filter(|b| !b.instances.is_empty())
            .map(|batch| {
                let start = all.len() as u32;
                all.extend_from_slice(&batch.instances);
                DrawRange {
                    mesh: batch.mesh,
                    instances: start..all.len() as u32,
                }
            })
            .collect()
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.depth_texture = Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Depth view for the frame's render pass, once created
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth_texture.as_ref()
    }

    /// Draw the opaque instances
    pub fn draw_opaque(&self, pass: &mut wgpu::RenderPass<'_>, library: &MeshLibrary) {
        self.draw_ranges(pass, library, &self.opaque_pipeline, &self.opaque_ranges);
    }

    /// Draw the transparent instances (call after everything opaque)
    pub fn draw_transparent(&self, pass: &mut wgpu::RenderPass<'_>, library: &MeshLibrary) {
        self.draw_ranges(pass, library, &self.transparent_pipeline, &self.transparent_ranges);
    }

    fn draw_ranges(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        library: &MeshLibrary,
        pipeline: &wgpu::RenderPipeline,
        ranges: &[DrawRange],
    ) {
        if ranges.is_empty() {
            return;
        }
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(1, self.instances.buffer().slice(..));

        for range in ranges {
            let Some(mesh) = library.get(range.mesh) else {
                log::warn!("Mesh {:?} not uploaded, skipping draw", range.mesh);
                continue;
            };
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, range.instances.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::Material;
    use orrery_math::mat4;

    #[test]
    fn test_vertex_buffer_layout_stride() {
        let layout = MeshPipeline::vertex_buffer_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<MeshVertex>() as u64);
    }

    #[test]
    fn test_instance_layout_covers_instance() {
        let layout = MeshPipeline::instance_buffer_layout();
        assert_eq!(layout.array_stride, std::mem::size_of::<MeshInstance>() as u64);
        let last = layout.attributes.last().unwrap();
        assert_eq!(last.offset + 16, layout.array_stride);
    }

    #[test]
    fn test_append_batches_ranges() {
        let instance = MeshInstance::new(mat4::IDENTITY, &Material::WHITE);
        let batches = vec![
            InstanceBatch { mesh: MeshKind::Cube, instances: vec![instance; 3] },
            InstanceBatch { mesh: MeshKind::Dodecahedron, instances: Vec::new() },
            InstanceBatch { mesh: MeshKind::Sphere { segments: 8 }, instances: vec![instance; 2] },
        ];
        let mut all = Vec::new();
        let ranges = MeshPipeline::append_batches(&mut all, &batches);

        assert_eq!(all.len(), 5);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].instances, 0..3);
        assert_eq!(ranges[1].mesh, MeshKind::Sphere { segments: 8 });
        assert_eq!(ranges[1].instances, 3..5);
    }
}
