//! Orbit controller for inspecting the system
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right drag: pan the target in the view plane
//! - Mouse wheel: zoom towards or away from the target
//! - Left click (press and release without dragging): reported for picking

use std::f32::consts::{FRAC_PI_2, PI};
use orrery_math::Vec3;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Scroll distance in pixels treated as one wheel line
const PIXELS_PER_LINE: f32 = 100.0;

/// Largest pitch magnitude (radians); the poles make the view basis degenerate
pub const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

/// Orbit controller for handling mouse input
pub struct OrbitController {
    // Button state
    rotating: bool,
    panning: bool,

    // Cursor state (window pixels)
    cursor: Option<(f64, f64)>,
    press_position: Option<(f64, f64)>,
    pending_click: Option<(f64, f64)>,

    // Accumulated input since the last update
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: (f32, f32),
    pending_zoom: f32,

    // Damped rotation carried between updates
    yaw_velocity: f32,
    pitch_velocity: f32,

    viewport_height: f32,

    // Configuration
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_damping: bool,
    /// Fraction of the rotation velocity removed each update
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pitch is kept inside `±max_pitch` (radians)
    pub max_pitch: f32,
    /// Cursor travel in pixels below which a press-release is a click
    pub click_threshold: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            rotating: false,
            panning: false,

            cursor: None,
            press_position: None,
            pending_click: None,

            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: (0.0, 0.0),
            pending_zoom: 0.0,

            yaw_velocity: 0.0,
            pitch_velocity: 0.0,

            viewport_height: 600.0,

            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            enable_zoom: true,
            enable_pan: true,
            enable_damping: true,
            damping_factor: 0.25,
            min_distance: 1.5,
            max_distance: 500.0,
            max_pitch: MAX_PITCH,
            click_threshold: 4.0,
        }
    }

    /// Tell the controller the window height (drag speed is relative to it)
    pub fn set_viewport_height(&mut self, height: f32) {
        if height > 0.0 {
            self.viewport_height = height;
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => {
                self.rotating = pressed;
                if pressed {
                    self.press_position = self.cursor;
                } else if let (Some(start), Some(end)) = (self.press_position.take(), self.cursor) {
                    let travel = ((end.0 - start.0).powi(2) + (end.1 - start.1).powi(2)).sqrt();
                    if travel as f32 <= self.click_threshold {
                        self.pending_click = Some(end);
                    }
                }
            }
            MouseButton::Right => {
                self.panning = pressed;
            }
            _ => {}
        }
    }

    /// Process the cursor moving to a new window position
    pub fn process_cursor_moved(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.cursor {
            let dx = (x - last_x) as f32;
            let dy = (y - last_y) as f32;
            if self.rotating {
                self.pending_yaw += dx;
                self.pending_pitch += dy;
            } else if self.panning && self.enable_pan {
                self.pending_pan.0 += dx;
                self.pending_pan.1 += dy;
            }
        }
        self.cursor = Some((x, y));
    }

    /// Process the cursor leaving the window
    pub fn process_cursor_left(&mut self) {
        self.cursor = None;
        self.press_position = None;
        self.rotating = false;
        self.panning = false;
    }

    /// Process mouse wheel input
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        if !self.enable_zoom {
            return;
        }
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        self.pending_zoom += lines;
    }

    /// Last cursor position, if the cursor is over the window
    pub fn cursor_position(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    /// Take the position of a click since the last call
    pub fn consume_click(&mut self) -> Option<(f64, f64)> {
        self.pending_click.take()
    }

    /// Check if a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }

    /// Apply accumulated input to the camera
    ///
    /// Call once per frame. With damping on, the camera keeps turning after
    /// the mouse stops, losing `damping_factor` of its speed each update.
    pub fn update<C: OrbitControl>(&mut self, camera: &mut C) {
        let radians_per_pixel = 2.0 * PI * self.rotate_speed / self.viewport_height;

        // Drag right orbits the camera left, drag down raises it
        self.yaw_velocity -= self.pending_yaw * radians_per_pixel;
        self.pitch_velocity += self.pending_pitch * radians_per_pixel;

        let pitch = camera.pitch();
        let target_pitch = (pitch + self.pitch_velocity).clamp(-self.max_pitch, self.max_pitch);
        camera.orbit(self.yaw_velocity, target_pitch - pitch);

        if self.enable_damping {
            self.yaw_velocity *= 1.0 - self.damping_factor;
            self.pitch_velocity *= 1.0 - self.damping_factor;
        } else {
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
        }

        if self.pending_pan != (0.0, 0.0) {
            // One pixel moves the target by one pixel's worth of the view
            // plane at the target distance
            let world_per_pixel = 2.0 * camera.distance() * (camera.fov_y() / 2.0).tan()
                / self.viewport_height
                * self.pan_speed;
            camera.pan(
                -self.pending_pan.0 * world_per_pixel,
                self.pending_pan.1 * world_per_pixel,
            );
        }

        if self.pending_zoom != 0.0 {
            let factor = 0.95f32.powf(self.pending_zoom * self.zoom_speed);
            let distance = (camera.distance() * factor).clamp(self.min_distance, self.max_distance);
            camera.set_distance(distance);
        }

        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_pan = (0.0, 0.0);
        self.pending_zoom = 0.0;
    }

    /// Drop any motion still coasting from damping
    pub fn stop(&mut self) {
        self.yaw_velocity = 0.0;
        self.pitch_velocity = 0.0;
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_pan = (0.0, 0.0);
        self.pending_zoom = 0.0;
    }

    /// Builder: set the damping factor (0 disables damping)
    pub fn with_damping_factor(mut self, factor: f32) -> Self {
        self.damping_factor = factor;
        self.enable_damping = factor > 0.0;
        self
    }

    /// Builder: enable or disable zoom
    pub fn with_zoom(mut self, enabled: bool) -> Self {
        self.enable_zoom = enabled;
        self
    }

    /// Builder: enable or disable panning
    pub fn with_pan(mut self, enabled: bool) -> Self {
        self.enable_pan = enabled;
        self
    }

    /// Builder: set rotate speed
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Builder: set zoom speed
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: set the allowed camera distance range
    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Builder: set the click travel threshold in pixels
    pub fn with_click_threshold(mut self, pixels: f32) -> Self {
        self.click_threshold = pixels;
        self
    }
}

/// Trait for orbit camera control
/// Allows the controller to work with different camera implementations
pub trait OrbitControl {
    /// Rotate around the target by yaw and pitch deltas (radians)
    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32);
    /// Move the target along the camera's right and up axes (world units)
    fn pan(&mut self, right: f32, up: f32);
    fn set_distance(&mut self, distance: f32);
    fn distance(&self) -> f32;
    fn pitch(&self) -> f32;
    /// Vertical field of view (radians)
    fn fov_y(&self) -> f32;
    fn target(&self) -> Vec3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockCamera {
        yaw: f32,
        pitch: f32,
        distance: f32,
        target: Vec3,
        orbit_calls: usize,
    }

    impl MockCamera {
        fn new() -> Self {
            Self {
                distance: 10.0,
                ..Default::default()
            }
        }
    }

    impl OrbitControl for MockCamera {
        fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
            self.yaw += delta_yaw;
            self.pitch += delta_pitch;
            self.orbit_calls += 1;
        }
        fn pan(&mut self, right: f32, up: f32) {
            self.target += Vec3::new(right, up, 0.0);
        }
        fn set_distance(&mut self, distance: f32) {
            self.distance = distance;
        }
        fn distance(&self) -> f32 {
            self.distance
        }
        fn pitch(&self) -> f32 {
            self.pitch
        }
        fn fov_y(&self) -> f32 {
            75f32.to_radians()
        }
        fn target(&self) -> Vec3 {
            self.target
        }
    }

    fn press(controller: &mut OrbitController, button: MouseButton) {
        controller.process_mouse_button(button, ElementState::Pressed);
    }

    fn release(controller: &mut OrbitController, button: MouseButton) {
        controller.process_mouse_button(button, ElementState::Released);
    }

    #[test]
    fn test_defaults() {
        let controller = OrbitController::new();
        assert_eq!(controller.damping_factor, 0.25);
        assert!(controller.enable_damping);
        assert!(controller.enable_zoom);
    }

    #[test]
    fn test_click_without_travel() {
        let mut controller = OrbitController::new();
        controller.process_cursor_moved(100.0, 200.0);
        press(&mut controller, MouseButton::Left);
        controller.process_cursor_moved(101.0, 201.0);
        release(&mut controller, MouseButton::Left);

        assert_eq!(controller.consume_click(), Some((101.0, 201.0)));
        // Consumed only once
        assert_eq!(controller.consume_click(), None);
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut controller = OrbitController::new();
        controller.process_cursor_moved(100.0, 100.0);
        press(&mut controller, MouseButton::Left);
        controller.process_cursor_moved(160.0, 100.0);
        release(&mut controller, MouseButton::Left);

        assert_eq!(controller.consume_click(), None);
    }

    #[test]
    fn test_right_click_is_not_a_pick() {
        let mut controller = OrbitController::new();
        controller.process_cursor_moved(10.0, 10.0);
        press(&mut controller, MouseButton::Right);
        release(&mut controller, MouseButton::Right);
        assert_eq!(controller.consume_click(), None);
    }

    #[test]
    fn test_drag_rotates_camera() {
        let mut controller = OrbitController::new().with_damping_factor(0.0);
        let mut camera = MockCamera::new();
        controller.set_viewport_height(600.0);

        controller.process_cursor_moved(0.0, 0.0);
        press(&mut controller, MouseButton::Left);
        controller.process_cursor_moved(60.0, 30.0);
        controller.update(&mut camera);

        let per_pixel = 2.0 * PI / 600.0;
        assert!((camera.yaw + 60.0 * per_pixel).abs() < 1e-5);
        assert!((camera.pitch - 30.0 * per_pixel).abs() < 1e-5);

        // Without damping nothing carries over
        controller.update(&mut camera);
        assert!((camera.yaw + 60.0 * per_pixel).abs() < 1e-5);
    }

    #[test]
    fn test_motion_without_button_does_nothing() {
        let mut controller = OrbitController::new();
        let mut camera = MockCamera::new();
        controller.process_cursor_moved(0.0, 0.0);
        controller.process_cursor_moved(200.0, 200.0);
        controller.update(&mut camera);
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn test_damping_decays_rotation() {
        let mut controller = OrbitController::new();
        let mut camera = MockCamera::new();

        controller.process_cursor_moved(0.0, 0.0);
        press(&mut controller, MouseButton::Left);
        controller.process_cursor_moved(100.0, 0.0);
        controller.update(&mut camera);
        let first = camera.yaw;

        controller.update(&mut camera);
        let second = camera.yaw - first;

        // The second update coasts at 75% of the first
        assert!((second - first * 0.75).abs() < 1e-5);

        for _ in 0..200 {
            controller.update(&mut camera);
        }
        let settled = camera.yaw;
        controller.update(&mut camera);
        assert!((camera.yaw - settled).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut controller = OrbitController::new().with_damping_factor(0.0);
        let mut camera = MockCamera::new();

        controller.process_cursor_moved(0.0, 0.0);
        press(&mut controller, MouseButton::Left);
        controller.process_cursor_moved(0.0, 5000.0);
        controller.update(&mut camera);

        assert!((camera.pitch - controller.max_pitch).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_in_and_clamp() {
        let mut controller = OrbitController::new();
        let mut camera = MockCamera::new();

        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        controller.update(&mut camera);
        assert!((camera.distance - 9.5).abs() < 1e-5);

        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, 500.0));
        controller.update(&mut camera);
        assert_eq!(camera.distance, controller.min_distance);

        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, -5000.0));
        controller.update(&mut camera);
        assert_eq!(camera.distance, controller.max_distance);
    }

    #[test]
    fn test_zoom_disabled() {
        let mut controller = OrbitController::new().with_zoom(false);
        let mut camera = MockCamera::new();
        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, 3.0));
        controller.update(&mut camera);
        assert_eq!(camera.distance, 10.0);
    }

    #[test]
    fn test_right_drag_pans_target() {
        let mut controller = OrbitController::new();
        let mut camera = MockCamera::new();

        controller.process_cursor_moved(0.0, 0.0);
        press(&mut controller, MouseButton::Right);
        controller.process_cursor_moved(50.0, 0.0);
        controller.update(&mut camera);

        // Dragging right moves the target left
        assert!(camera.target.x < 0.0);
        assert_eq!(camera.orbit_calls, 1);
        assert_eq!(camera.yaw, 0.0);
    }

    #[test]
    fn test_cursor_left_cancels_drag() {
        let mut controller = OrbitController::new();
        controller.process_cursor_moved(0.0, 0.0);
        press(&mut controller, MouseButton::Left);
        assert!(controller.is_dragging());
        controller.process_cursor_left();
        assert!(!controller.is_dragging());
        assert!(controller.cursor_position().is_none());
    }
}
