//! Entity and Material types
//!
//! An Entity is one body of the system: the star, its atmosphere, a planet,
//! an asteroid, or a background star.

use std::collections::HashSet;
use bitflags::bitflags;
use orrery_math::Vec3;
use orrery_physics::{BodyKey, CircularOrbit, TiltedRing};
use serde::{Deserialize, Serialize};
use crate::{EntityKey, Transform3D};

bitflags! {
    /// Flags indicating which parts of an entity have changed and need updating
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Transform (position, rotation, scale) has changed
        const TRANSFORM = 1 << 0;
        /// Mesh has changed
        const MESH = 1 << 1;
        /// Material has changed
        const MATERIAL = 1 << 2;
        /// All flags set - entity needs full rebuild
        const ALL = Self::TRANSFORM.bits() | Self::MESH.bits() | Self::MATERIAL.bits();
    }
}

/// Convert a `0xRRGGBB` color to RGB components in 0.0-1.0
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Surface properties of an entity
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Base color as RGBA (each component 0.0-1.0, alpha unused; see `opacity`)
    pub base_color: [f32; 4],
    /// Emissive color (RGB)
    pub emissive: [f32; 3],
    /// Multiplier for the emissive color
    pub emissive_intensity: f32,
    /// 1.0 is opaque; anything lower is drawn in the transparent pass
    pub opacity: f32,
    /// 0.0 is mirror-like, 1.0 fully diffuse
    pub roughness: f32,
    pub metalness: f32,
    /// Skip lighting entirely and output the base color
    pub unlit: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0], // White
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 1.0,
            opacity: 1.0,
            roughness: 1.0,
            metalness: 0.0,
            unlit: false,
        }
    }
}

impl Material {
    /// Lit material with the given color, roughness, and metalness
    pub fn standard(hex: u32, roughness: f32, metalness: f32) -> Self {
        let [r, g, b] = rgb_from_hex(hex);
        Self {
            base_color: [r, g, b, 1.0],
            roughness,
            metalness,
            ..Self::default()
        }
    }

    /// White lit material glowing with the given color
    pub fn emissive(hex: u32, intensity: f32) -> Self {
        Self {
            emissive: rgb_from_hex(hex),
            emissive_intensity: intensity,
            ..Self::default()
        }
    }

    /// Lit material blended over what is behind it
    pub fn transparent(hex: u32, opacity: f32) -> Self {
        let [r, g, b] = rgb_from_hex(hex);
        Self {
            base_color: [r, g, b, 1.0],
            opacity,
            ..Self::default()
        }
    }

    /// Unlit material with a flat color
    pub fn basic(hex: u32) -> Self {
        let [r, g, b] = rgb_from_hex(hex);
        Self {
            base_color: [r, g, b, 1.0],
            unlit: true,
            ..Self::default()
        }
    }

    /// Whether this material needs alpha blending
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Emissive color premultiplied by its intensity
    pub fn emissive_radiance(&self) -> [f32; 3] {
        [
            self.emissive[0] * self.emissive_intensity,
            self.emissive[1] * self.emissive_intensity,
            self.emissive[2] * self.emissive_intensity,
        ]
    }

    /// White material
    pub const WHITE: Self = Self {
        base_color: [1.0, 1.0, 1.0, 1.0],
        emissive: [0.0, 0.0, 0.0],
        emissive_intensity: 1.0,
        opacity: 1.0,
        roughness: 1.0,
        metalness: 0.0,
        unlit: false,
    };
}

/// Unit-sized mesh an entity is drawn with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshKind {
    /// Radius-1 UV sphere with the given number of segments around its equator
    Sphere { segments: u32 },
    /// Cube with side 1
    Cube,
    /// Dodecahedron with circumradius 1
    Dodecahedron,
}

/// What role an entity plays in the system
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Atmosphere,
    Planet,
    Asteroid,
    BackgroundStar,
}

/// A body in the system
///
/// `size` scales the mesh only. Children (field lines) follow the entity's
/// transform but are not scaled by its size.
pub struct Entity {
    /// Optional name for this entity (for lookup and the info panel)
    pub name: Option<String>,
    /// Tags for categorization (e.g., "pickable", "orbiting")
    pub tags: HashSet<String>,
    /// Role of this body
    pub kind: BodyKind,
    /// Transform relative to the parent
    pub transform: Transform3D,
    /// Mesh the entity is drawn with
    pub mesh: MeshKind,
    /// Mesh size: radius for spheres and dodecahedra, side for cubes
    pub size: f32,
    pub material: Material,
    /// Parent entity, if any
    pub parent: Option<EntityKey>,
    /// Circular orbit in the ecliptic (planets)
    pub orbit: Option<CircularOrbit>,
    /// Tilted ring orbit (asteroids)
    pub ring: Option<TiltedRing>,
    /// Rotation added about Y each frame (radians)
    pub spin: f32,
    /// Optional gravity body key (links to GravityWorld)
    pub gravity_body: Option<BodyKey>,
    /// Bounding-sphere radius for click picking; None = not pickable
    pub pick_radius: Option<f32>,
    dirty: DirtyFlags,
}

impl Entity {
    /// Create a new entity of the given kind and mesh
    pub fn new(kind: BodyKind, mesh: MeshKind) -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            kind,
            transform: Transform3D::identity(),
            mesh,
            size: 1.0,
            material: Material::default(),
            parent: None,
            orbit: None,
            ring: None,
            spin: 0.0,
            gravity_body: None,
            pick_radius: None,
            dirty: DirtyFlags::ALL,
        }
    }

    /// Set the name of this entity
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a tag to this entity
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set the transform
    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Set the mesh size
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Set the material
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Attach this entity under a parent
    pub fn with_parent(mut self, parent: EntityKey) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Put this entity on a circular orbit and move it to the orbit position
    pub fn with_orbit(mut self, orbit: CircularOrbit) -> Self {
        self.transform.position = orbit.position();
        self.orbit = Some(orbit);
        self
    }

    /// Put this entity on a tilted ring and move it to the ring position
    pub fn with_ring(mut self, ring: TiltedRing) -> Self {
        self.transform.position = ring.position();
        self.ring = Some(ring);
        self
    }

    /// Set the per-frame spin about Y
    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = spin;
        self
    }

    /// Link this entity to a gravity body
    pub fn with_gravity_body(mut self, key: BodyKey) -> Self {
        self.gravity_body = Some(key);
        self
    }

    /// Make this entity pickable with the given bounding radius
    pub fn with_pick_radius(mut self, radius: f32) -> Self {
        self.pick_radius = Some(radius);
        self
    }

    /// Check if this entity has a specific tag
    #[inline]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Check if this entity has any dirty flags set
    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Get the current dirty flags
    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Mark specific parts of this entity as dirty
    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    /// Clear all dirty flags
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }

    /// Set the position and mark the transform dirty
    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.dirty |= DirtyFlags::TRANSFORM;
    }

    /// Advance orbit, ring, and spin by one frame
    ///
    /// Orbits only drive x and z, so a y offset set elsewhere is preserved.
    pub fn advance(&mut self) {
        let mut moved = false;
        if let Some(orbit) = self.orbit.as_mut() {
            orbit.advance();
            let (x, z) = orbit.xz();
            self.transform.position.x = x;
            self.transform.position.z = z;
            moved = true;
        }
        if let Some(ring) = self.ring.as_mut() {
            ring.advance();
            self.transform.position = ring.position();
            moved = true;
        }
        if self.spin != 0.0 {
            self.transform.rotation.y += self.spin;
            moved = true;
        }
        if moved {
            self.dirty |= DirtyFlags::TRANSFORM;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(rgb_from_hex(0xffffff), [1.0, 1.0, 1.0]);
        assert_eq!(rgb_from_hex(0x000000), [0.0, 0.0, 0.0]);
        let [r, g, b] = rgb_from_hex(0x3399ff);
        assert!((r - 0.2).abs() < 1e-6);
        assert!((g - 0.6).abs() < 1e-6);
        assert_eq!(b, 1.0);
    }

    #[test]
    fn test_material_kinds() {
        let star = Material::emissive(0xffdf00, 1.0);
        assert_eq!(star.base_color, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(star.emissive_radiance()[0], 1.0);
        assert!(!star.is_transparent());

        let atmosphere = Material::transparent(0xffdf00, 0.3);
        assert!(atmosphere.is_transparent());

        let background = Material::basic(0xffffff);
        assert!(background.unlit);

        let planet = Material::standard(0x3399ff, 0.7, 0.1);
        assert_eq!(planet.roughness, 0.7);
        assert_eq!(planet.metalness, 0.1);
        assert!(!planet.unlit);
    }

    #[test]
    fn test_new_entity_is_dirty() {
        let entity = Entity::new(BodyKind::Star, MeshKind::Sphere { segments: 64 });
        assert!(entity.is_dirty());
        assert_eq!(entity.dirty_flags(), DirtyFlags::ALL);
        assert!(entity.pick_radius.is_none());
    }

    #[test]
    fn test_builders() {
        let entity = Entity::new(BodyKind::Planet, MeshKind::Sphere { segments: 32 })
            .with_name("Earth")
            .with_tag("pickable")
            .with_size(0.2)
            .with_pick_radius(0.2)
            .with_spin(0.01)
            .with_orbit(CircularOrbit::new(3.0, 0.004));

        assert_eq!(entity.name.as_deref(), Some("Earth"));
        assert!(entity.has_tag("pickable"));
        assert_eq!(entity.size, 0.2);
        assert_eq!(entity.pick_radius, Some(0.2));
        assert_eq!(entity.transform.position, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_advance_planet() {
        let mut entity = Entity::new(BodyKind::Planet, MeshKind::Sphere { segments: 32 })
            .with_orbit(CircularOrbit::new(3.0, 0.004))
            .with_spin(0.01);
        entity.transform.position.y = 0.5;
        entity.clear_dirty();

        entity.advance();

        let expected_x = 3.0 * 0.004f32.cos();
        let expected_z = 3.0 * 0.004f32.sin();
        assert!((entity.transform.position.x - expected_x).abs() < 1e-6);
        assert!((entity.transform.position.z - expected_z).abs() < 1e-6);
        // y is left alone by the orbit
        assert_eq!(entity.transform.position.y, 0.5);
        assert!((entity.transform.rotation.y - 0.01).abs() < 1e-7);
        assert!(entity.dirty_flags().contains(DirtyFlags::TRANSFORM));
    }

    #[test]
    fn test_advance_asteroid() {
        let mut entity = Entity::new(BodyKind::Asteroid, MeshKind::Cube)
            .with_ring(TiltedRing::new(9.0, 0.0));
        entity.advance();
        let ring = entity.ring.unwrap();
        assert!((ring.angle - 0.001).abs() < 1e-7);
        assert_eq!(entity.transform.position, ring.position());
    }

    #[test]
    fn test_static_entity_stays_clean() {
        let mut entity = Entity::new(BodyKind::BackgroundStar, MeshKind::Sphere { segments: 24 });
        entity.clear_dirty();
        entity.advance();
        assert!(!entity.is_dirty());
    }
}
