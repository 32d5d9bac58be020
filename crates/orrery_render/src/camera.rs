//! Orbit camera
//!
//! The camera sits on a sphere around a target point, described by yaw
//! (about +Y, measured from +Z towards +X), pitch (elevation above the XZ
//! plane), and distance.

use orrery_input::{OrbitControl, MAX_PITCH};
use orrery_math::{mat4, Mat4, Ray, Vec3};

/// Camera orbiting a target point
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Azimuth around +Y (radians)
    pub yaw: f32,
    /// Elevation above the XZ plane (radians)
    pub pitch: f32,
    pub distance: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport width divided by height
    pub aspect: f32,
    home: (Vec3, Vec3),
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitCamera {
    /// Camera at (10, 10, 10) looking at the origin with a 75° field of view
    pub fn new() -> Self {
        Self::looking_at(Vec3::new(10.0, 10.0, 10.0), Vec3::ZERO)
    }

    /// Camera placed at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            target,
            yaw: 0.0,
            pitch: 0.0,
            distance: 1.0,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect: 1.0,
            home: (position, target),
        };
        camera.place(position, target);
        camera
    }

    /// Builder: set the projection (field of view in degrees)
    pub fn with_projection(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_degrees.to_radians();
        self.near = near;
        self.far = far;
        self
    }

    fn place(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        self.target = target;
        self.distance = offset.length().max(f32::EPSILON);
        self.pitch = (offset.y / self.distance)
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-MAX_PITCH, MAX_PITCH);
        self.yaw = offset.x.atan2(offset.z);
    }

    /// Return to the starting position and target
    pub fn reset(&mut self) {
        let (position, target) = self.home;
        self.place(position, target);
    }

    /// Move the point the camera orbits around, keeping the offset
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio from a viewport size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Camera position in world space
    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.pitch.sin_cos();
        let (sin_y, cos_y) = self.yaw.sin_cos();
        self.target + Vec3::new(cos_p * sin_y, sin_p, cos_p * cos_y) * self.distance
    }

    /// Unit vector from the camera towards the target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalized()
    }

    /// Camera right and up axes
    pub fn basis(&self) -> (Vec3, Vec3) {
        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalized();
        let up = right.cross(forward);
        (right, up)
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4::look_at(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        mat4::perspective(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        mat4::mul(&self.projection_matrix(), &self.view_matrix())
    }

    /// Ray from the camera through a point in normalized device coordinates
    ///
    /// `x` and `y` run from -1 to 1, with +y at the top of the viewport.
    pub fn ray_from_ndc(&self, x: f32, y: f32) -> Ray {
        let tan_half = (self.fov_y / 2.0).tan();
        let (right, up) = self.basis();
        let direction = self.forward() + right * (x * tan_half * self.aspect) + up * (y * tan_half);
        Ray::new(self.position(), direction)
    }
}

impl OrbitControl for OrbitCamera {
    fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;
    }

    fn pan(&mut self, right: f32, up: f32) {
        let (right_axis, up_axis) = self.basis();
        self.target += right_axis * right + up_axis * up;
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
        self.fov_y
    }

    fn target(&self) -> Vec3 {
        self.target
    }
}
