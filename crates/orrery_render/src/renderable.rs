//! Renderable scene - bridges the World to per-frame GPU data
//!
//! Entities become mesh instances grouped by mesh kind, field lines become
//! world-space line segments, and particle clouds become points.

use std::collections::HashMap;
use orrery_core::{MeshKind, World};
use orrery_math::{mat4, Vec3};

use crate::pipeline::{ColorVertex, MeshInstance};

/// Instances sharing one mesh
#[derive(Clone, Debug)]
pub struct InstanceBatch {
    pub mesh: MeshKind,
    pub instances: Vec<MeshInstance>,
}

/// Everything drawn in one frame, ready for upload
#[derive(Clone, Debug, Default)]
pub struct RenderableScene {
    /// Opaque instances, one batch per mesh kind
    pub opaque: Vec<InstanceBatch>,
    /// Blended instances, one batch per mesh kind
    pub transparent: Vec<InstanceBatch>,
    /// Line segments as vertex pairs
    pub lines: Vec<ColorVertex>,
    /// Dust points
    pub points: Vec<ColorVertex>,
}

impl RenderableScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect everything drawable from a world
    pub fn from_world(world: &World) -> Self {
        let mut scene = Self::new();
        scene.collect_entities(world);
        scene.collect_field_lines(world);
        scene.collect_points(world);
        scene
    }

    /// Rebuild the entity batches and field lines, keeping the points
    ///
    /// Points only change when the world is rebuilt, so they can be
    /// collected once with [`RenderableScene::collect_points`].
    pub fn update(&mut self, world: &World) {
        self.opaque.clear();
        self.transparent.clear();
        self.lines.clear();
        self.collect_entities(world);
        self.collect_field_lines(world);
    }

    /// Group entity instances by mesh kind
    pub fn collect_entities(&mut self, world: &World) {
        let mut opaque_index: HashMap<MeshKind, usize> = HashMap::new();
        let mut transparent_index: HashMap<MeshKind, usize> = HashMap::new();

        for (key, entity) in world.iter() {
            let Some(parent_matrix) = world.world_transform(key) else {
                continue;
            };
            let model = mat4::mul(&parent_matrix, &mat4::scale(Vec3::splat(entity.size)));
            let instance = MeshInstance::new(model, &entity.material);

            let (batches, index) = if entity.material.is_transparent() {
                (&mut self.transparent, &mut transparent_index)
            } else {
                (&mut self.opaque, &mut opaque_index)
            };
            let slot = *index.entry(entity.mesh).or_insert_with(|| {
                batches.push(InstanceBatch {
                    mesh: entity.mesh,
                    instances: Vec::new(),
                });
                batches.len() - 1
            });
            batches[slot].instances.push(instance);
        }
    }

    /// Turn every field line into world-space segments
    ///
    /// Lines follow their parent's transform; a line whose parent is gone
    /// is skipped.
    pub fn collect_field_lines(&mut self, world: &World) {
        let color = world.field_lines.color;
        for line in world.field_lines.lines() {
            let matrix = match line.parent {
                Some(parent) => match world.world_transform(parent) {
                    Some(m) => m,
                    None => continue,
                },
                None => mat4::IDENTITY,
            };
            for pair in line.points.windows(2) {
                self.lines.push(ColorVertex::new(mat4::transform_point(&matrix, pair[0]), color));
                self.lines.push(ColorVertex::new(mat4::transform_point(&matrix, pair[1]), color));
            }
        }
    }

    /// Collect every particle cloud as points
    pub fn collect_points(&mut self, world: &World) {
        self.points.clear();
        for cloud in &world.particles {
            self.points
                .extend(cloud.positions.iter().map(|p| ColorVertex::new(*p, cloud.color)));
        }
    }

    /// Total number of mesh instances
    pub fn instance_count(&self) -> usize {
        self.opaque
            .iter()
            .chain(&self.transparent)
            .map(|b| b.instances.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::{BodyKind, Entity, Material, ParticleCloud, Transform3D};

    fn world_with_star() -> (World, orrery_core::EntityKey) {
        let mut world = World::new();
        let star = world.add_entity(
            Entity::new(BodyKind::Star, MeshKind::Sphere { segments: 64 })
                .with_material(Material::emissive(0xffdf00, 1.0)),
        );
        world.add_entity(
            Entity::new(BodyKind::Atmosphere, MeshKind::Sphere { segments: 64 })
                .with_size(1.2)
                .with_material(Material::transparent(0xffdf00, 0.3)),
        );
        (world, star)
    }

    #[test]
    fn test_transparent_split() {
        let (world, _) = world_with_star();
        let scene = RenderableScene::from_world(&world);
        assert_eq!(scene.opaque.len(), 1);
        assert_eq!(scene.transparent.len(), 1);
        assert_eq!(scene.instance_count(), 2);
        // Atmosphere is scaled by its size
        assert_eq!(scene.transparent[0].instances[0].model[0][0], 1.2);
    }

    #[test]
    fn test_batches_by_mesh_kind() {
        let mut world = World::new();
        for _ in 0..3 {
            world.add_entity(Entity::new(BodyKind::Asteroid, MeshKind::Cube));
        }
        world.add_entity(Entity::new(BodyKind::Asteroid, MeshKind::Dodecahedron));
        world.add_entity(Entity::new(BodyKind::Asteroid, MeshKind::Sphere { segments: 8 }));
        world.add_entity(Entity::new(BodyKind::BackgroundStar, MeshKind::Sphere { segments: 24 }));

        let scene = RenderableScene::from_world(&world);
        assert_eq!(scene.opaque.len(), 4);
        let cubes = scene.opaque.iter().find(|b| b.mesh == MeshKind::Cube).unwrap();
        assert_eq!(cubes.instances.len(), 3);
    }

    #[test]
    fn test_size_does_not_scale_children() {
        let mut world = World::new();
        let planet = world.add_entity(
            Entity::new(BodyKind::Planet, MeshKind::Sphere { segments: 8 })
                .with_transform(Transform3D::from_position(Vec3::new(3.0, 0.0, 0.0)))
                .with_size(0.2),
        );
        world.field_lines.add_loops(Some(planet), 0.4, 1, 2);

        let scene = RenderableScene::from_world(&world);
        // One line of three points: two segments, four vertices
        assert_eq!(scene.lines.len(), 4);
        // North pole of the loop sits 0.4 above the planet, not 0.08
        assert_eq!(scene.lines[0].position, [3.0, 0.4, 0.0]);
    }

    #[test]
    fn test_removed_parent_drops_lines() {
        let (mut world, star) = world_with_star();
        world.field_lines.add_loops(Some(star), 1.5, 2, 4);
        world.field_lines.add_loops(None, 1.5, 1, 4);
        assert_eq!(world.field_lines.len(), 3);
        world.remove_entity(star);

        let scene = RenderableScene::from_world(&world);
        assert_eq!(scene.lines.len(), 4 * 2);
    }

    #[test]
    fn test_points_from_particles() {
        let mut world = World::new();
        world.particles.push(ParticleCloud::new(
            vec![Vec3::ZERO, Vec3::ONE],
            0.1,
            [1.0, 1.0, 1.0],
        ));
        let mut scene = RenderableScene::from_world(&world);
        assert_eq!(scene.points.len(), 2);
        assert_eq!(scene.points[1].position, [1.0, 1.0, 1.0]);

        // update keeps the points
        scene.update(&world);
        assert_eq!(scene.points.len(), 2);
    }
}
