//! Integration tests for the world pipeline
//!
//! These tests put the pieces together the way the application does:
//! 1. A scene template drives the procedural generators
//! 2. Entities with orbits advance frame by frame
//! 3. Mutual gravity syncs positions through the gravity world
//! 4. Field lines follow their parent entity

use orrery_core::procedural::{asteroid_belt, background_stars, space_dust};
use orrery_core::{
    BodyKind, CircularOrbit, Entity, GravityBody, GravityConfig, Material, MeshKind,
    SystemScene, Vec3, World,
};
use orrery_math::mat4;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn planet(size: f32, distance: f32, speed: f32) -> Entity {
    Entity::new(BodyKind::Planet, MeshKind::Sphere { segments: 32 })
        .with_size(size)
        .with_pick_radius(size)
        .with_material(Material::standard(0x3399ff, 0.7, 0.1))
        .with_orbit(CircularOrbit::new(distance, speed))
        .with_spin(0.01)
}

// ==================== Generation Tests ====================

#[test]
fn test_default_scene_populates_world() {
    let scene = SystemScene::default();
    let mut rng = StdRng::seed_from_u64(1234);
    let mut world = World::new();

    for asteroid in asteroid_belt(&mut rng, &scene.asteroid_belt) {
        world.add_entity(asteroid);
    }
    for star in background_stars(&mut rng, &scene.background_stars) {
        world.add_entity(star);
    }
    world.particles.push(space_dust(&mut rng, &scene.space_dust));

    assert_eq!(world.entity_count(), 4000);
    assert_eq!(world.particles[0].len(), 2000);
    assert_eq!(
        world.iter().filter(|(_, e)| e.kind == BodyKind::Asteroid).count(),
        3000
    );
}

// ==================== Orbit Tests ====================

#[test]
fn test_planets_orbit_at_their_own_speed() {
    let mut world = World::new();
    let fast = world.add_entity(planet(0.2, 3.0, 0.004));
    let slow = world.add_entity(planet(0.3, 5.0, 0.00016));

    for _ in 0..100 {
        world.advance_orbits();
    }

    let fast_angle = world.get_entity(fast).unwrap().orbit.unwrap().angle;
    let slow_angle = world.get_entity(slow).unwrap().orbit.unwrap().angle;
    assert!((fast_angle - 0.4).abs() < 1e-4);
    assert!((slow_angle - 0.016).abs() < 1e-5);

    let p = world.world_position(fast).unwrap();
    assert!((p.length() - 3.0).abs() < 1e-4);
    assert_eq!(p.y, 0.0);
}

// ==================== Gravity Tests ====================

#[test]
fn test_gravity_moves_planets_towards_each_other() {
    let mut world = World::new().with_gravity(GravityConfig::default());

    let gravity = world.gravity_mut().expect("gravity enabled");
    let body_a = gravity.add_body(GravityBody::new(Vec3::ZERO, 5.972e24));
    let body_b = gravity.add_body(GravityBody::new(Vec3::ZERO, 6.39e23));

    let a = world.add_entity(planet(0.2, 3.0, 0.0).with_gravity_body(body_a));
    let b = world.add_entity(planet(0.3, 5.0, 0.0).with_gravity_body(body_b));

    world.step_gravity();

    let pa = world.get_entity(a).unwrap().transform.position;
    let pb = world.get_entity(b).unwrap().transform.position;
    assert!(pa.is_finite() && pb.is_finite());
    assert!(pa.x > 3.0, "inner planet pulled outwards: {:?}", pa);
    assert!(pb.x < 5.0, "outer planet pulled inwards: {:?}", pb);
}

// ==================== Field Line Tests ====================

#[test]
fn test_field_lines_follow_parent() {
    let mut world = World::new();
    let key = world.add_entity(planet(0.2, 3.0, 0.0));
    world.field_lines.add_loops(Some(key), 0.4, 20, 50);

    let line = &world.field_lines.lines()[0];
    assert_eq!(line.parent, Some(key));

    // North pole of the loop is above the planet in world space
    let parent = world.world_transform(key).unwrap();
    let top = mat4::transform_point(&parent, line.points[0]);
    assert!((top - Vec3::new(3.0, 0.4, 0.0)).length() < 1e-5, "got {:?}", top);

    world.field_lines.animate(2.0);
    assert_eq!(world.field_lines.point_count(), 20 * 51);
}
