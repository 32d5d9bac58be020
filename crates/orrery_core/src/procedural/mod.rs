//! Procedural geometry generators
//!
//! Field lines are deterministic. The belt, starfield, and dust take any
//! [`rand::Rng`] so scenes can be reproduced from a seed.

mod field_lines;
mod asteroid_belt;
mod starfield;

pub use field_lines::{generate_loops, FieldLine, FieldLineSet, DEFAULT_LINE_COUNT, DEFAULT_SEGMENTS};
pub use asteroid_belt::{asteroid_belt, pick_asteroid_mesh};
pub use starfield::{background_stars, space_dust};
