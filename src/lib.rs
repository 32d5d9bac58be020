//! Orrery - an animated toy solar system
//!
//! The binary in `main.rs` wires these modules to a window:
//! - [`config`] - layered application configuration
//! - [`scene`] - building the system into a world
//! - [`systems`] - simulation, picking, info panel, window, and rendering
//! - [`input`] - key bindings

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
