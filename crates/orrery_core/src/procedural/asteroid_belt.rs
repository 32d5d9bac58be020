//! Asteroid belt generator

use std::f32::consts::PI;
use orrery_math::Vec3;
use orrery_physics::TiltedRing;
use rand::Rng;

use crate::scene::BeltTemplate;
use crate::{BodyKind, Entity, Material, MeshKind, Transform3D};

/// Choose an asteroid mesh from a uniform sample in `[0, 1)`
///
/// Roughly a third each: spheres, cubes, and dodecahedra.
pub fn pick_asteroid_mesh(sample: f32, sphere_segments: u32) -> MeshKind {
    if sample < 0.33 {
        MeshKind::Sphere { segments: sphere_segments }
    } else if sample < 0.66 {
        MeshKind::Cube
    } else {
        MeshKind::Dodecahedron
    }
}

/// Generate `template.count` asteroids on a tilted ring
///
/// Samples are drawn per asteroid in a fixed order (size, shape, angle,
/// distance, then the three rotation angles) so a seeded RNG reproduces
/// the same belt.
pub fn asteroid_belt<R: Rng + ?Sized>(rng: &mut R, template: &BeltTemplate) -> Vec<Entity> {
    let material = Material::standard(template.color, template.roughness, template.metalness);

    (0..template.count)
        .map(|_| {
            let size = rng.gen::<f32>() * template.size_spread + template.min_size;
            let mesh = pick_asteroid_mesh(rng.gen::<f32>(), template.sphere_segments);
            let angle = rng.gen::<f32>() * 2.0 * PI;
            let distance = template.inner_distance + rng.gen::<f32>() * template.distance_spread;
            let rotation = Vec3::new(
                rng.gen::<f32>() * PI,
                rng.gen::<f32>() * PI,
                rng.gen::<f32>() * PI,
            );

            let ring = TiltedRing::new(distance, angle)
                .with_tilt(template.tilt)
                .with_step(template.angular_step);

            Entity::new(BodyKind::Asteroid, mesh)
                .with_transform(Transform3D::from_position_rotation(Vec3::ZERO, rotation))
                .with_ring(ring)
                .with_size(size)
                .with_material(material)
        })
        .collect()
}
