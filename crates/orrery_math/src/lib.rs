//! 3D Mathematics Library
//!
//! This crate provides the vector, matrix, and ray types used by the Orrery
//! workspace.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix with transformation helpers
//! - [`Ray`] - Half-line used for mouse picking

mod vec3;
pub mod mat4;
pub mod ray;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use ray::Ray;
