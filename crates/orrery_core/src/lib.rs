//! Core types for the Orrery
//!
//! This crate provides the scene graph the simulation mutates and the
//! renderer draws:
//!
//! - [`Transform3D`] - Position, Euler rotation, and uniform scale
//! - [`Material`] - Surface properties (lit, emissive, transparent, unlit)
//! - [`Entity`] - A body in the system with transform, mesh, and material
//! - [`World`] - Container for entities, field lines, particles, and lights
//! - [`EntityKey`] - Generational key to an entity in the world
//! - [`SystemScene`] - Loadable/saveable description of a star system
//! - [`procedural`] - Field-line, asteroid-belt, and starfield generators

mod transform;
mod entity;
mod world;
mod scene;
pub mod procedural;

pub use transform::Transform3D;
pub use entity::{rgb_from_hex, BodyKind, DirtyFlags, Entity, Material, MeshKind};
pub use world::{EntityKey, ParticleCloud, World};
pub use scene::{
    BackgroundTemplate, BeltTemplate, DirectionalLight, DustTemplate, FieldLineTemplate,
    Lighting, PlanetTemplate, PointLight, SceneLoadError, SceneSaveError, StarTemplate,
    SystemScene,
};
pub use procedural::{FieldLine, FieldLineSet};

// Re-export commonly used types from orrery_math for convenience
pub use orrery_math::{Mat4, Ray, Vec3};

// Re-export physics types for convenient access through orrery_core
pub use orrery_physics::{BodyKey, CircularOrbit, GravityBody, GravityConfig, GravityWorld, TiltedRing};
