//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Mesh, line, and point pipelines
//! - Frame rendering

use std::sync::Arc;
use winit::window::Window;
use orrery_core::Lighting;
use orrery_render::{
    camera::OrbitCamera,
    context::{ContextError, RenderContext},
    geometry::MeshLibrary,
    pipeline::{FlatUniforms, LinePipeline, MeshPipeline, PointPipeline, SceneUniforms},
    RenderableScene,
};
use crate::config::RenderingConfig;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// The GPU context could not be created
    Context(ContextError),
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Context(e) => write!(f, "Render context error: {}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    mesh_pipeline: MeshPipeline,
    line_pipeline: LinePipeline,
    point_pipeline: PointPipeline,
    library: MeshLibrary,
    render_config: RenderingConfig,
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(
        window: Arc<Window>,
        render_config: RenderingConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;
        let format = context.config.format;

        let mut mesh_pipeline = MeshPipeline::new(&context.device, format);
        let line_pipeline = LinePipeline::new(&context.device, format);
        let point_pipeline = PointPipeline::new(&context.device, format);

        mesh_pipeline.ensure_depth_texture(
            &context.device,
            context.size.width,
            context.size.height,
        );

        Ok(Self {
            context,
            mesh_pipeline,
            line_pipeline,
            point_pipeline,
            library: MeshLibrary::new(),
            render_config,
        })
    }

    /// Handle window resize
    ///
    /// A minimized window reports a zero size; the surface and depth texture
    /// keep their previous size until it is restored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.mesh_pipeline.ensure_depth_texture(&self.context.device, width, height);
    }

    /// Reconfigure the surface at its current size (after the surface was lost)
    pub fn reconfigure(&mut self) {
        let size = self.context.size;
        self.resize(size.width, size.height);
    }

    /// Render a single frame
    ///
    /// Draw order within the single pass: opaque meshes, field lines, dust,
    /// then the blended meshes on top.
    pub fn render_frame(
        &mut self,
        camera: &OrbitCamera,
        lighting: &Lighting,
        scene: &RenderableScene,
    ) -> Result<(), RenderError> {
        let view_proj = camera.view_projection();
        let device = &self.context.device;
        let queue = &self.context.queue;

        self.mesh_pipeline
            .update_uniforms(queue, &SceneUniforms::new(view_proj, camera.position(), lighting));
        let flat = FlatUniforms { view_proj };
        self.line_pipeline.update_uniforms(queue, &flat);
        self.point_pipeline.update_uniforms(queue, &flat);

        self.mesh_pipeline.prepare(
            device,
            queue,
            &mut self.library,
            &scene.opaque,
            &scene.transparent,
        );
        self.line_pipeline.prepare(device, queue, &scene.lines);
        self.point_pipeline.prepare(device, queue, &scene.points);

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => return Err(RenderError::SurfaceLost),
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let depth_view = self
            .mesh_pipeline
            .depth_view()
            .ok_or_else(|| RenderError::Other("depth texture missing".to_string()))?;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        let bg = &self.render_config.background_color;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg[0] as f64,
                            g: bg[1] as f64,
                            b: bg[2] as f64,
                            a: bg[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_pipeline.draw_opaque(&mut pass, &self.library);
            self.line_pipeline.draw(&mut pass);
            self.point_pipeline.draw(&mut pass);
            self.mesh_pipeline.draw_transparent(&mut pass, &self.library);
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}
