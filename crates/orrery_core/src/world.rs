//! World container for entities
//!
//! The World owns every entity of the system together with the decorative
//! geometry that is not an entity (field lines, dust) and the lights.

use orrery_math::{mat4, Mat4, Vec3};
use orrery_physics::{GravityConfig, GravityWorld};
use slotmap::{new_key_type, SlotMap};

use crate::entity::DirtyFlags;
use crate::procedural::FieldLineSet;
use crate::scene::Lighting;
use crate::Entity;

new_key_type! {
    /// Generational key to an entity in the world
    pub struct EntityKey;
}

/// A cloud of points drawn with a fixed size and color
#[derive(Clone, Debug)]
pub struct ParticleCloud {
    pub positions: Vec<Vec3>,
    /// Point size in scene units
    pub size: f32,
    pub color: [f32; 3],
}

impl ParticleCloud {
    /// Create a point cloud
    pub fn new(positions: Vec<Vec3>, size: f32, color: [f32; 3]) -> Self {
        Self {
            positions,
            size,
            color,
        }
    }

    /// Number of points
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// The system: entities plus field lines, particles, and lights
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    /// Optional mutual gravity (None = kinematic orbits only)
    gravity_world: Option<GravityWorld>,
    /// Magnetic field lines attached to entities
    pub field_lines: FieldLineSet,
    /// Point clouds (space dust)
    pub particles: Vec<ParticleCloud>,
    /// Scene lighting
    pub lighting: Lighting,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a world with pre-allocated capacity for entities
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: SlotMap::with_capacity_and_key(capacity),
            gravity_world: None,
            field_lines: FieldLineSet::default(),
            particles: Vec::new(),
            lighting: Lighting::default(),
        }
    }

    /// Enable mutual gravity for this world
    pub fn with_gravity(mut self, config: GravityConfig) -> Self {
        self.gravity_world = Some(GravityWorld::with_config(config));
        self
    }

    /// Get the gravity world (if enabled)
    pub fn gravity(&self) -> Option<&GravityWorld> {
        self.gravity_world.as_ref()
    }

    /// Get the mutable gravity world (if enabled)
    pub fn gravity_mut(&mut self) -> Option<&mut GravityWorld> {
        self.gravity_world.as_mut()
    }

    /// Add an entity to the world, returning its key
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        self.entities.insert(entity)
    }

    /// Remove an entity, detaching its children and field lines
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let removed = self.entities.remove(key)?;
        for entity in self.entities.values_mut() {
            if entity.parent == Some(key) {
                entity.parent = None;
                entity.mark_dirty(DirtyFlags::TRANSFORM);
            }
        }
        self.field_lines.remove_parent(key);
        Some(removed)
    }

    /// Get a reference to an entity by key
    pub fn get_entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Get a mutable reference to an entity by key
    pub fn get_entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Find the first entity with the given name
    pub fn get_by_name(&self, name: &str) -> Option<(EntityKey, &Entity)> {
        self.entities
            .iter()
            .find(|(_, e)| e.name.as_deref() == Some(name))
    }

    /// Iterate over entities carrying a tag
    pub fn get_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = (EntityKey, &'a Entity)> + 'a {
        self.entities.iter().filter(move |(_, e)| e.has_tag(tag))
    }

    /// Get the number of entities
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Check if the world has no entities
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over keys and entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Iterate over keys and entities mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityKey, &mut Entity)> {
        self.entities.iter_mut()
    }

    /// Local-to-world matrix of an entity, composing its parent chain
    ///
    /// Returns None if the key is stale. A parent link that is stale is
    /// treated as the end of the chain.
    pub fn world_transform(&self, key: EntityKey) -> Option<Mat4> {
        let entity = self.entities.get(key)?;
        let mut matrix = entity.transform.to_matrix();
        let mut parent = entity.parent;
        // Guard against accidental cycles
        let mut depth = 0;
        while let Some(parent_key) = parent {
            let Some(parent_entity) = self.entities.get(parent_key) else {
                break;
            };
            matrix = mat4::mul(&parent_entity.transform.to_matrix(), &matrix);
            parent = parent_entity.parent;
            depth += 1;
            if depth > self.entities.len() {
                log::warn!("parent cycle detected at entity {:?}", key);
                break;
            }
        }
        Some(matrix)
    }

    /// World-space position of an entity
    pub fn world_position(&self, key: EntityKey) -> Option<Vec3> {
        self.world_transform(key)
            .map(|m| mat4::transform_point(&m, Vec3::ZERO))
    }

    /// Advance every entity's orbit, ring, and spin by one frame
    pub fn advance_orbits(&mut self) {
        for entity in self.entities.values_mut() {
            entity.advance();
        }
    }

    /// Run one mutual gravity step over the entities linked to gravity bodies
    ///
    /// Entity positions are copied into the gravity world, the world is
    /// stepped, and the integrated positions are written back. Does nothing
    /// when gravity is disabled.
    pub fn step_gravity(&mut self) {
        let Some(gravity) = self.gravity_world.as_mut() else {
            return;
        };

        for entity in self.entities.values() {
            if let Some(body_key) = entity.gravity_body {
                if let Some(body) = gravity.get_body_mut(body_key) {
                    body.position = entity.transform.position;
                }
            }
        }

        gravity.step();

        for entity in self.entities.values_mut() {
            if let Some(body_key) = entity.gravity_body {
                if let Some(body) = gravity.get_body(body_key) {
                    entity.set_position(body.position);
                }
            }
        }
    }

    /// Check if any entity has dirty flags set
    pub fn has_dirty_entities(&self) -> bool {
        self.entities.values().any(|e| e.is_dirty())
    }

    /// Iterate over dirty entities
    pub fn dirty_entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter().filter(|(_, e)| e.is_dirty())
    }

    /// Clear dirty flags on all entities
    pub fn clear_all_dirty(&mut self) {
        for entity in self.entities.values_mut() {
            entity.clear_dirty();
        }
    }

    /// Remove every entity, field line, and particle cloud
    pub fn clear(&mut self) {
        self.entities.clear();
        self.field_lines.clear();
        self.particles.clear();
    }
}
