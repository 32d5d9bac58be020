//! Simulation system
//!
//! Advances the system by one frame:
//! - Planet orbits and spin, asteroid ring positions
//! - Optional mutual gravity among planets
//! - Field-line animation

use std::time::Instant;
use orrery_core::World;
use crate::config::SimulationConfig;

/// Result of a simulation update
pub struct SimulationResult {
    /// Whether instances and lines need to be rebuilt and re-uploaded
    pub geometry_dirty: bool,
}

/// Manages the per-frame simulation
pub struct SimulationSystem {
    start: Instant,
    mutual_gravity: bool,
    paused: bool,
    frames: u64,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            start: Instant::now(),
            mutual_gravity: config.mutual_gravity,
            paused: config.paused,
            frames: 0,
        }
    }

    /// Run one simulation frame, using seconds since start as the animation time
    pub fn update(&mut self, world: &mut World) -> SimulationResult {
        let time = self.start.elapsed().as_secs_f32();
        self.step(world, time)
    }

    /// Run one simulation frame at an explicit animation time
    ///
    /// Orbits move by a fixed amount per frame regardless of `time`; only the
    /// field-line wobble depends on it.
    pub fn step(&mut self, world: &mut World, time: f32) -> SimulationResult {
        if self.paused {
            return SimulationResult {
                geometry_dirty: world.has_dirty_entities(),
            };
        }

        world.advance_orbits();

        if self.mutual_gravity {
            world.step_gravity();
        }

        world.field_lines.animate(time);
        self.frames += 1;

        log::trace!("simulation frame {} at t = {:.3}", self.frames, time);

        SimulationResult { geometry_dirty: true }
    }

    /// Pause or resume; returns true if now paused
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of frames simulated so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBuilder;
    use orrery_core::{BeltTemplate, GravityConfig, PlanetTemplate, StarTemplate, Vec3};

    fn small_system(gravity: bool) -> World {
        let builder = SceneBuilder::with_seed(5);
        let builder = if gravity {
            builder.with_gravity(GravityConfig::default())
        } else {
            builder
        };
        builder
            .add_star(&StarTemplate::default())
            .add_planet(&PlanetTemplate::new(0.2, 0x3399ff, 3.0, 0.004, 5.972e24).with_name("Blue"))
            .add_planet(&PlanetTemplate::new(0.3, 0xff9933, 5.0, 0.00016, 6.39e23).with_name("Orange"))
            .add_asteroid_belt(&BeltTemplate {
                count: 5,
                ..BeltTemplate::default()
            })
            .build()
    }

    #[test]
    fn test_planet_advances_and_spins() {
        let mut world = small_system(false);
        let mut sim = SimulationSystem::default();

        sim.step(&mut world, 0.0);

        let (_, blue) = world.get_by_name("Blue").unwrap();
        let angle = blue.orbit.unwrap().angle;
        assert!((angle - 0.004).abs() < 1e-7);
        assert!((blue.transform.position.x - 3.0 * angle.cos()).abs() < 1e-5);
        assert!((blue.transform.position.z - 3.0 * angle.sin()).abs() < 1e-5);
        assert!((blue.transform.rotation.y - 0.01).abs() < 1e-7);
        assert_eq!(sim.frames(), 1);
    }

    #[test]
    fn test_asteroids_stay_on_ring() {
        let mut world = small_system(false);
        let mut sim = SimulationSystem::default();

        for _ in 0..10 {
            sim.step(&mut world, 0.0);
        }

        for (_, asteroid) in world.get_by_tag("asteroid") {
            let ring = asteroid.ring.unwrap();
            assert_eq!(asteroid.transform.position, ring.position());
            assert!((asteroid.transform.position.length() - ring.distance).abs() < 1e-3);
        }
    }

    #[test]
    fn test_paused_freezes_world() {
        let mut world = small_system(false);
        let mut sim = SimulationSystem::default();
        assert!(sim.toggle_pause());

        sim.step(&mut world, 1.0);

        let (_, blue) = world.get_by_name("Blue").unwrap();
        assert_eq!(blue.orbit.unwrap().angle, 0.0);
        assert_eq!(sim.frames(), 0);

        assert!(!sim.toggle_pause());
        sim.step(&mut world, 1.0);
        assert_eq!(sim.frames(), 1);
    }

    #[test]
    fn test_gravity_off_by_default() {
        let mut world = small_system(true);
        let mut sim = SimulationSystem::default();
        sim.step(&mut world, 0.0);

        // The gravity world is never stepped
        let (_, blue) = world.get_by_name("Blue").unwrap();
        let body = world.gravity().unwrap().get_body(blue.gravity_body.unwrap()).unwrap();
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_mutual_gravity_pulls_planets() {
        let mut world = small_system(true);
        let mut sim = SimulationSystem::new(&SimulationConfig {
            mutual_gravity: true,
            ..SimulationConfig::default()
        });
        sim.step(&mut world, 0.0);

        let (_, blue) = world.get_by_name("Blue").unwrap();
        let body = world.gravity().unwrap().get_body(blue.gravity_body.unwrap()).unwrap();
        // The orange planet sits further out along +x
        assert!(body.velocity.x > 0.0);
        assert_eq!(blue.transform.position, body.position);
    }

    #[test]
    fn test_field_lines_animated() {
        let mut world = small_system(false);
        let mut sim = SimulationSystem::default();
        sim.step(&mut world, 0.0);

        // Line 0 point 0 sits on the +z pole at r = 1.5 + 0.2·sin(0)
        let first = world.field_lines.lines()[0].points[0];
        assert!((first - Vec3::new(0.0, 0.0, 1.5)).length() < 1e-5);
    }
}
