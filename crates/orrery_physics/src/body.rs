//! Gravitational body type

use orrery_math::Vec3;
use slotmap::new_key_type;

// Define generational key type for gravitational bodies
new_key_type! {
    /// Key to a body in the gravity world
    ///
    /// Generational: a key to a removed body returns None instead of aliasing
    /// whatever body later reuses the slot.
    pub struct BodyKey;
}

/// A point mass taking part in the mutual gravity update
#[derive(Clone, Copy, Debug)]
pub struct GravityBody {
    /// Position in scene units
    pub position: Vec3,
    /// Velocity in scene units per step
    pub velocity: Vec3,
    /// Mass in kilograms (f64: planet masses overflow f32 products)
    pub mass: f64,
}

impl GravityBody {
    /// Create a body at rest
    pub fn new(position: Vec3, mass: f64) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            mass,
        }
    }

    /// Set the initial velocity of this body
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}
