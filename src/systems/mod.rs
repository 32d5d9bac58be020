//! Application systems
//!
//! Modular systems kept out of main.rs for better organization and testability.

mod info;
mod picking;
mod render;
mod simulation;
mod window;

pub use info::{describe, InfoPanel};
pub use picking::{cursor_to_ndc, pick, PickHit, PickingSystem};
pub use render::{RenderError, RenderSystem};
pub use simulation::{SimulationResult, SimulationSystem};
pub use window::{format_title, WindowError, WindowSystem};
