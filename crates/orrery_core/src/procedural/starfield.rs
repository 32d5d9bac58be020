//! Background stars and space dust

use orrery_math::Vec3;
use rand::Rng;

use crate::scene::{BackgroundTemplate, DustTemplate};
use crate::{BodyKind, Entity, Material, MeshKind, ParticleCloud, Transform3D};

/// Generate background star spheres in a cube of side `2 * template.extent`
pub fn background_stars<R: Rng + ?Sized>(rng: &mut R, template: &BackgroundTemplate) -> Vec<Entity> {
    let material = Material::basic(template.color);
    let extent = template.extent;

    (0..template.count)
        .map(|_| {
            let position = Vec3::new(
                rng.gen::<f32>() * 2.0 * extent - extent,
                rng.gen::<f32>() * 2.0 * extent - extent,
                rng.gen::<f32>() * 2.0 * extent - extent,
            );
            Entity::new(
                BodyKind::BackgroundStar,
                MeshKind::Sphere { segments: template.segments },
            )
            .with_transform(Transform3D::from_position(position))
            .with_size(template.radius)
            .with_material(material)
        })
        .collect()
}

/// Generate a dust cloud centred on the origin
pub fn space_dust<R: Rng + ?Sized>(rng: &mut R, template: &DustTemplate) -> ParticleCloud {
    let positions = (0..template.count)
        .map(|_| {
            Vec3::new(
                (rng.gen::<f32>() - 0.5) * 2.0 * template.extent,
                (rng.gen::<f32>() - 0.5) * 2.0 * template.extent,
                (rng.gen::<f32>() - 0.5) * 2.0 * template.extent,
            )
        })
        .collect();

    ParticleCloud::new(positions, template.point_size, crate::rgb_from_hex(template.color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn in_cube(p: Vec3, extent: f32) -> bool {
        [p.x, p.y, p.z].iter().all(|c| *c >= -extent && *c < extent)
    }

    #[test]
    fn test_background_stars() {
        let mut rng = StdRng::seed_from_u64(11);
        let stars = background_stars(&mut rng, &BackgroundTemplate::default());

        assert_eq!(stars.len(), 1000);
        for star in &stars {
            assert_eq!(star.kind, BodyKind::BackgroundStar);
            assert_eq!(star.mesh, MeshKind::Sphere { segments: 24 });
            assert_eq!(star.size, 0.05);
            assert!(star.material.unlit);
            assert!(in_cube(star.transform.position, 100.0));
        }
    }

    #[test]
    fn test_space_dust() {
        let mut rng = StdRng::seed_from_u64(5);
        let dust = space_dust(&mut rng, &DustTemplate::default());

        assert_eq!(dust.len(), 2000);
        assert_eq!(dust.size, 0.1);
        assert_eq!(dust.color, [1.0, 1.0, 1.0]);
        assert!(dust.positions.iter().all(|p| in_cube(*p, 100.0)));
    }

    #[test]
    fn test_dust_spreads_over_both_signs() {
        let mut rng = StdRng::seed_from_u64(9);
        let dust = space_dust(&mut rng, &DustTemplate::default());
        assert!(dust.positions.iter().any(|p| p.x < -50.0));
        assert!(dust.positions.iter().any(|p| p.x > 50.0));
    }
}
