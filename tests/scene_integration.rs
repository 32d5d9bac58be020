//! Integration tests for the shipped scene file
//!
//! Loads `scenes/solar_system.ron` and builds it the way the binary does.

use orrery::scene::SceneBuilder;
use orrery::systems::{describe, pick, SimulationSystem};
use orrery_core::{BodyKind, GravityConfig, Ray, SystemScene, Vec3};

fn shipped_scene() -> SystemScene {
    let path = std::env::current_dir().unwrap().join("scenes/solar_system.ron");
    SystemScene::load(path).unwrap()
}

#[test]
fn test_shipped_scene_matches_builtin() {
    assert_eq!(shipped_scene(), SystemScene::default());
}

#[test]
fn test_shipped_scene_builds() {
    let world = SceneBuilder::from_scene(&shipped_scene(), GravityConfig::default(), Some(9));

    assert_eq!(world.iter().filter(|(_, e)| e.kind == BodyKind::Planet).count(), 3);
    assert_eq!(world.iter().filter(|(_, e)| e.kind == BodyKind::Asteroid).count(), 3000);
    assert_eq!(world.iter().filter(|(_, e)| e.kind == BodyKind::BackgroundStar).count(), 1000);
    assert_eq!(world.field_lines.len(), 80);
}

#[test]
fn test_click_on_planet_after_frames() {
    let mut world = SceneBuilder::from_scene(&shipped_scene(), GravityConfig::default(), Some(9));
    let mut sim = SimulationSystem::default();
    for _ in 0..60 {
        sim.step(&mut world, 0.0);
    }

    // Aim straight down at the innermost planet's current position
    let (key, _) = world
        .iter()
        .filter(|(_, e)| e.kind == BodyKind::Planet)
        .min_by(|a, b| a.1.orbit.unwrap().distance.total_cmp(&b.1.orbit.unwrap().distance))
        .unwrap();
    let target = world.world_position(key).unwrap();
    let ray = Ray::new(target + Vec3::new(0.0, 20.0, 0.0), -Vec3::Y);

    let hit = pick(&world, &ray).unwrap();
    assert_eq!(hit.key, key);
    assert_eq!(
        describe(world.get_entity(hit.key)),
        "Planet: Unknown\nType: Terrestrial"
    );
}
