//! Gravity world and the pairwise update rule

use crate::body::{BodyKey, GravityBody};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

/// Newton's gravitational constant in m^3 kg^-1 s^-2
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;

/// Configuration for the gravity update
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GravityConfig {
    /// Gravitational constant used in `F = G·m1·m2 / r²`
    pub gravitational_constant: f64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: GRAVITATIONAL_CONSTANT,
        }
    }
}

impl GravityConfig {
    /// Create a config with the given gravitational constant
    pub fn new(gravitational_constant: f64) -> Self {
        Self { gravitational_constant }
    }
}

/// The set of bodies attracting each other
pub struct GravityWorld {
    bodies: SlotMap<BodyKey, GravityBody>,
    /// Gravity configuration
    pub config: GravityConfig,
}

impl Default for GravityWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GravityWorld {
    /// Create a gravity world with the real gravitational constant
    pub fn new() -> Self {
        Self::with_config(GravityConfig::default())
    }

    /// Create a gravity world with a custom configuration
    pub fn with_config(config: GravityConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            config,
        }
    }

    /// Add a body and return its key
    pub fn add_body(&mut self, body: GravityBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Remove a body and return it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<GravityBody> {
        self.bodies.remove(key)
    }

    /// Get a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&GravityBody> {
        self.bodies.get(key)
    }

    /// Get a mutable body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut GravityBody> {
        self.bodies.get_mut(key)
    }

    /// Number of bodies
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Advance every body by one unit time step
    ///
    /// Each unordered pair is visited once. The pair's force magnitude
    /// `G·m_i·m_j / r²` is turned into accelerations along the pair axis, which
    /// are added straight into the velocities; positions then move by their
    /// velocity. There is no softening: bodies at the same position produce
    /// NaN velocities.
    pub fn step(&mut self) {
        let keys: Vec<BodyKey> = self.bodies.keys().collect();
        let g = self.config.gravitational_constant;

        for (i, &key_a) in keys.iter().enumerate() {
            for &key_b in &keys[i + 1..] {
                let a = self.bodies[key_a];
                let b = self.bodies[key_b];

                let delta = b.position - a.position;
                let distance = delta.length() as f64;
                let force = g * a.mass * b.mass / (distance * distance);
                let direction = delta.normalized();

                let accel_a = (force / a.mass) as f32;
                let accel_b = (force / b.mass) as f32;

                self.bodies[key_a].velocity += direction * accel_a;
                self.bodies[key_b].velocity -= direction * accel_b;
            }
        }

        for body in self.bodies.values_mut() {
            body.position += body.velocity;
        }

        log::trace!("gravity step over {} bodies", keys.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_math::Vec3;

    fn unit_world() -> GravityWorld {
        GravityWorld::with_config(GravityConfig::new(1.0))
    }

    #[test]
    fn test_default_constant() {
        let world = GravityWorld::new();
        assert_eq!(world.config.gravitational_constant, 6.67430e-11);
    }

    #[test]
    fn test_add_and_remove_body() {
        let mut world = unit_world();
        let key = world.add_body(GravityBody::new(Vec3::ZERO, 1.0));
        assert_eq!(world.body_count(), 1);
        assert!(world.remove_body(key).is_some());
        assert!(world.get_body(key).is_none());
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_pair_attracts_along_axis() {
        let mut world = unit_world();
        let a = world.add_body(GravityBody::new(Vec3::ZERO, 1.0));
        let b = world.add_body(GravityBody::new(Vec3::new(2.0, 0.0, 0.0), 1.0));

        world.step();

        // F = 1·1·1 / 2² = 0.25, a = F/m = 0.25 for both
        let body_a = world.get_body(a).unwrap();
        let body_b = world.get_body(b).unwrap();
        assert!((body_a.velocity.x - 0.25).abs() < 1e-6);
        assert!((body_b.velocity.x + 0.25).abs() < 1e-6);
        // Unit time step: p += v
        assert!((body_a.position.x - 0.25).abs() < 1e-6);
        assert!((body_b.position.x - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_acceleration_scales_with_inverse_mass() {
        let mut world = unit_world();
        let light = world.add_body(GravityBody::new(Vec3::ZERO, 1.0));
        let heavy = world.add_body(GravityBody::new(Vec3::new(0.0, 0.0, 1.0), 4.0));

        world.step();

        // F = 4, light gets 4/1, heavy gets 4/4
        assert!((world.get_body(light).unwrap().velocity.z - 4.0).abs() < 1e-6);
        assert!((world.get_body(heavy).unwrap().velocity.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_accumulates_across_steps() {
        let mut world = unit_world();
        let a = world.add_body(GravityBody::new(Vec3::ZERO, 1.0));
        world.add_body(GravityBody::new(Vec3::new(10.0, 0.0, 0.0), 1.0));

        world.step();
        let v1 = world.get_body(a).unwrap().velocity.x;
        world.step();
        let v2 = world.get_body(a).unwrap().velocity.x;

        assert!(v2 > v1, "explicit Euler keeps adding acceleration");
    }

    #[test]
    fn test_single_body_drifts_with_velocity() {
        let mut world = unit_world();
        let key = world.add_body(GravityBody::new(Vec3::ZERO, 1.0).with_velocity(Vec3::Y));
        world.step();
        world.step();
        assert_eq!(world.get_body(key).unwrap().position, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_coincident_bodies_diverge() {
        let mut world = unit_world();
        let a = world.add_body(GravityBody::new(Vec3::ONE, 1.0));
        world.add_body(GravityBody::new(Vec3::ONE, 1.0));

        world.step();

        // r = 0 is not guarded: the update blows up instead of being clamped
        let body = world.get_body(a).unwrap();
        assert!(!body.velocity.is_finite());
        assert!(!body.position.is_finite());
    }

    #[test]
    fn test_planet_masses_do_not_overflow() {
        let mut world = GravityWorld::new();
        let earth = world.add_body(GravityBody::new(Vec3::new(3.0, 0.0, 0.0), 5.972e24));
        world.add_body(GravityBody::new(Vec3::new(5.0, 0.0, 0.0), 6.39e23));

        world.step();

        let v = world.get_body(earth).unwrap().velocity;
        assert!(v.is_finite());
        assert!(v.x > 0.0);
    }
}
