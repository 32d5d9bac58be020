//! Orrery - an animated toy solar system
//!
//! A star, three planets, an asteroid belt, and decorative field lines,
//! inspected with orbit controls. Click the star or a planet to follow it.

use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use orrery::config::{AppConfig, ControlsConfig};
use orrery::input::{InputAction, InputMapper};
use orrery::scene::SceneBuilder;
use orrery::systems::{
    cursor_to_ndc, InfoPanel, PickingSystem, RenderError, RenderSystem, SimulationSystem,
    WindowSystem,
};
use orrery_core::{GravityConfig, SystemScene, Vec3, World};
use orrery_input::OrbitController;
use orrery_render::{camera::OrbitCamera, RenderableScene};

/// Main application state
struct App {
    config: AppConfig,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    world: World,
    /// Per-frame draw data rebuilt from the world
    renderable: RenderableScene,
    camera: OrbitCamera,
    controller: OrbitController,
    simulation: SimulationSystem,
    picking: PickingSystem,
    info: InfoPanel,
    fps_window: (Instant, u32),
}

impl App {
    fn new(config: AppConfig) -> Self {
        let scene = SystemScene::load(&config.scene.path).unwrap_or_else(|e| {
            log::warn!(
                "Failed to load scene '{}': {}. Using the built-in system.",
                config.scene.path,
                e
            );
            SystemScene::default()
        });

        let seed_override = (config.scene.seed != 0).then_some(config.scene.seed);
        let gravity = GravityConfig::new(config.simulation.gravitational_constant);
        let mut world = SceneBuilder::from_scene(&scene, gravity, seed_override);

        log::info!(
            "Loaded scene '{}' with {} entities, {} field lines, {} particle clouds",
            scene.name,
            world.entity_count(),
            world.field_lines.len(),
            world.particles.len()
        );

        let renderable = RenderableScene::from_world(&world);
        world.clear_all_dirty();

        let camera = OrbitCamera::looking_at(scene.camera_position, Vec3::ZERO).with_projection(
            config.camera.fov,
            config.camera.near,
            config.camera.far,
        );
        let controller = Self::build_controller(&config.controls);
        let simulation = SimulationSystem::new(&config.simulation);

        Self {
            config,
            window: None,
            render: None,
            world,
            renderable,
            camera,
            controller,
            simulation,
            picking: PickingSystem::new(),
            info: InfoPanel::new(),
            fps_window: (Instant::now(), 0),
        }
    }

    fn build_controller(config: &ControlsConfig) -> OrbitController {
        let mut controller = OrbitController::new()
            .with_damping_factor(config.damping_factor)
            .with_zoom(config.enable_zoom)
            .with_pan(config.enable_pan)
            .with_rotate_speed(config.rotate_speed)
            .with_zoom_speed(config.zoom_speed)
            .with_distance_range(config.min_distance, config.max_distance)
            .with_click_threshold(config.click_threshold);
        controller.enable_damping = config.enable_damping;
        controller
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ResetCamera => {
                self.camera.reset();
                self.controller.stop();
                self.picking.clear();
                self.info.update(None);
                log::info!("Camera reset to starting position");
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::TogglePause => {
                let paused = self.simulation.toggle_pause();
                log::info!("Simulation {}", if paused { "paused" } else { "resumed" });
            }
        }
    }

    /// Pick at a click position and refresh the info text
    fn handle_click(&mut self, x: f64, y: f64) {
        let Some(window) = &self.window else {
            return;
        };
        let size = window.inner_size();
        let Some((ndc_x, ndc_y)) = cursor_to_ndc(x, y, size.width, size.height) else {
            return;
        };

        let ray = self.camera.ray_from_ndc(ndc_x, ndc_y);
        let focused = self.picking.handle_click(&self.world, &ray);
        self.info.update(focused.and_then(|key| self.world.get_entity(key)));
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if let Some((x, y)) = self.controller.consume_click() {
            self.handle_click(x, y);
        }

        let result = self.simulation.update(&mut self.world);

        if let Some(target) = self.picking.focus_target(&self.world) {
            self.camera.set_target(target);
        }
        self.controller.update(&mut self.camera);

        if result.geometry_dirty {
            self.renderable.update(&self.world);
            self.world.clear_all_dirty();
        }

        if let Some(window) = &mut self.window {
            window.update_title(self.info.text(), self.simulation.is_paused());
        }

        if let Some(render) = &mut self.render {
            match render.render_frame(&self.camera, &self.world.lighting, &self.renderable) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => render.reconfigure(),
                Err(RenderError::OutOfMemory) => {
                    log::error!("GPU out of memory, exiting");
                    event_loop.exit();
                    return;
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        if self.config.debug.log_frame_rate {
            self.log_frame_rate();
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn log_frame_rate(&mut self) {
        let (start, frames) = &mut self.fps_window;
        *frames += 1;
        let elapsed = start.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            log::info!("{:.1} fps", *frames as f32 / elapsed);
            *start = Instant::now();
            *frames = 0;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let render = match RenderSystem::new(
            window.window().clone(),
            self.config.rendering.clone(),
            self.config.window.vsync,
        ) {
            Ok(render) => render,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = render.size();
        self.camera.set_viewport(width, height);
        self.controller.set_viewport_height(height as f32);

        log::info!(
            "Drawing {} mesh instances, {} line vertices, {} dust points",
            self.renderable.instance_count(),
            self.renderable.lines.len(),
            self.renderable.points.len()
        );

        window.request_redraw();
        self.window = Some(window);
        self.render = Some(render);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render) = &mut self.render {
                    render.resize(physical_size.width, physical_size.height);
                }
                self.camera.set_viewport(physical_size.width, physical_size.height);
                self.controller.set_viewport_height(physical_size.height as f32);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.controller.process_cursor_moved(position.x, position.y);
            }

            WindowEvent::CursorLeft { .. } => {
                self.controller.process_cursor_left();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.process_scroll(delta);
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }

            _ => {}
        }
    }
}

fn main() -> Result<(), EventLoopError> {
    // Configuration picks the default log level, so load it before logging starts
    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    log::info!("Starting Orrery");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)
}
