//! Kinematic orbits
//!
//! Planets and asteroids are not integrated; their angle advances by a fixed
//! amount per frame and the position is read off a circle.

use orrery_math::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

/// Tilt of the asteroid ring relative to the ecliptic (radians)
pub const DEFAULT_RING_TILT: f32 = FRAC_PI_4;

/// Angle added to each asteroid per frame (radians)
pub const DEFAULT_RING_STEP: f32 = 0.001;

/// A circular orbit in the XZ plane
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircularOrbit {
    /// Orbit radius
    pub distance: f32,
    /// Angle added per frame (radians)
    pub speed: f32,
    /// Current angle (radians)
    pub angle: f32,
}

impl CircularOrbit {
    /// Create an orbit starting at angle zero
    pub fn new(distance: f32, speed: f32) -> Self {
        Self {
            distance,
            speed,
            angle: 0.0,
        }
    }

    /// Advance the orbit by one frame
    pub fn advance(&mut self) {
        self.angle += self.speed;
    }

    /// Current (x, z) position on the orbit
    pub fn xz(&self) -> (f32, f32) {
        (
            self.distance * self.angle.cos(),
            self.distance * self.angle.sin(),
        )
    }

    /// Current position with y = 0
    pub fn position(&self) -> Vec3 {
        let (x, z) = self.xz();
        Vec3::new(x, 0.0, z)
    }
}

/// A circular orbit on a plane tilted about the X axis
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TiltedRing {
    /// Orbit radius
    pub distance: f32,
    /// Current angle (radians)
    pub angle: f32,
    /// Plane tilt (radians)
    pub tilt: f32,
    /// Angle added per frame (radians)
    pub step: f32,
}

impl TiltedRing {
    /// Create a ring orbit with the default tilt and speed
    pub fn new(distance: f32, angle: f32) -> Self {
        Self {
            distance,
            angle,
            tilt: DEFAULT_RING_TILT,
            step: DEFAULT_RING_STEP,
        }
    }

    /// Set the tilt of the ring plane
    pub fn with_tilt(mut self, tilt: f32) -> Self {
        self.tilt = tilt;
        self
    }

    /// Set the per-frame angle step
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Advance the ring by one frame
    pub fn advance(&mut self) {
        self.angle += self.step;
    }

    /// Current position on the tilted ring
    pub fn position(&self) -> Vec3 {
        let (sin_a, cos_a) = self.angle.sin_cos();
        Vec3::new(
            self.distance * cos_a,
            self.distance * sin_a * self.tilt.sin(),
            self.distance * sin_a * self.tilt.cos(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_orbit_starts_on_x_axis() {
        let orbit = CircularOrbit::new(3.0, 0.004);
        assert_eq!(orbit.position(), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_orbit_advance() {
        let mut orbit = CircularOrbit::new(5.0, 0.00016);
        orbit.advance();
        orbit.advance();
        assert!((orbit.angle - 0.00032).abs() < 1e-9);
    }

    #[test]
    fn test_orbit_quarter_turn() {
        let mut orbit = CircularOrbit::new(7.0, FRAC_PI_2);
        orbit.advance();
        let (x, z) = orbit.xz();
        assert!(x.abs() < 1e-5);
        assert!((z - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_orbit_radius_constant() {
        let mut orbit = CircularOrbit::new(5.0, 0.3);
        for _ in 0..50 {
            orbit.advance();
            assert!((orbit.position().length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ring_defaults() {
        let ring = TiltedRing::new(9.0, 0.0);
        assert_eq!(ring.tilt, FRAC_PI_4);
        assert_eq!(ring.step, 0.001);
        assert_eq!(ring.position(), Vec3::new(9.0, 0.0, 0.0));
    }

    #[test]
    fn test_ring_tilted_45_degrees() {
        let ring = TiltedRing::new(8.0, FRAC_PI_2);
        let p = ring.position();
        // Out of the ecliptic: y and z share the sin(angle) term equally
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - p.z).abs() < 1e-5);
        assert!((p.length() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_ring_advance() {
        let mut ring = TiltedRing::new(8.0, 1.0).with_step(0.5);
        ring.advance();
        assert!((ring.angle - 1.5).abs() < 1e-6);
    }
}
