//! Orbit-camera input handling
//!
//! This crate turns mouse input into orbit, pan, and zoom motions around a
//! target point, and tells clicks apart from drags.

mod orbit_controller;

pub use orbit_controller::{OrbitControl, OrbitController, MAX_PITCH};
