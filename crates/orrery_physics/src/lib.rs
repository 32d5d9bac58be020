//! Orbital motion for the Orrery
//!
//! This crate provides the (deliberately naive) motion model of the system:
//! - Gravitational bodies with mass and velocity
//! - A pairwise inverse-square update integrated with explicit Euler steps
//! - Kinematic circular orbits for planets and the tilted asteroid ring
//!
//! Nothing here guards against close approaches: coincident bodies produce
//! non-finite velocities.

pub mod body;
pub mod orbit;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, GravityBody};
pub use orbit::{CircularOrbit, TiltedRing, DEFAULT_RING_STEP, DEFAULT_RING_TILT};
pub use world::{GravityConfig, GravityWorld, GRAVITATIONAL_CONSTANT};
