//! Click picking and camera focus
//!
//! A click is turned into a ray through the cursor; the nearest pickable
//! entity the ray hits becomes the focused entity, and a click on empty
//! space clears the focus.

use orrery_core::{EntityKey, Ray, Vec3, World};

/// Nearest entity hit by a pick ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub key: EntityKey,
    /// Distance along the ray
    pub distance: f32,
}

/// Convert a cursor position in pixels to normalized device coordinates
///
/// Returns None for an empty viewport.
pub fn cursor_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Option<(f32, f32)> {
    if width == 0 || height == 0 {
        return None;
    }
    let ndc_x = (x / width as f64) * 2.0 - 1.0;
    let ndc_y = -((y / height as f64) * 2.0 - 1.0);
    Some((ndc_x as f32, ndc_y as f32))
}

/// Find the nearest pickable entity along a ray
///
/// Each pickable entity is tested as a sphere of its pick radius around its
/// world position.
pub fn pick(world: &World, ray: &Ray) -> Option<PickHit> {
    world
        .iter()
        .filter_map(|(key, entity)| {
            let radius = entity.pick_radius?;
            let center = world.world_position(key)?;
            let distance = ray.intersect_sphere(center, radius)?;
            Some(PickHit { key, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Tracks the entity the camera follows
#[derive(Debug, Default)]
pub struct PickingSystem {
    focused: Option<EntityKey>,
}

impl PickingSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick along `ray` and focus the result (or clear the focus on a miss)
    pub fn handle_click(&mut self, world: &World, ray: &Ray) -> Option<EntityKey> {
        self.focused = pick(world, ray).map(|hit| hit.key);
        match self.focused.and_then(|key| world.get_entity(key)) {
            Some(entity) => log::debug!("Picked {:?} {:?}", entity.kind, entity.name),
            None => log::debug!("Pick missed"),
        }
        self.focused
    }

    pub fn focused(&self) -> Option<EntityKey> {
        self.focused
    }

    pub fn clear(&mut self) {
        self.focused = None;
    }

    /// World position the camera should orbit, if something is focused
    ///
    /// A focused entity that no longer exists clears the focus.
    pub fn focus_target(&mut self, world: &World) -> Option<Vec3> {
        let key = self.focused?;
        let target = world.world_position(key);
        if target.is_none() {
            self.focused = None;
        }
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBuilder;
    use orrery_core::{PlanetTemplate, StarTemplate};

    fn system() -> World {
        SceneBuilder::with_seed(1)
            .add_star(&StarTemplate::default())
            .add_planet(&PlanetTemplate::new(0.2, 0x3399ff, 3.0, 0.004, 5.972e24).with_name("Blue"))
            .build()
    }

    #[test]
    fn test_cursor_to_ndc() {
        assert_eq!(cursor_to_ndc(400.0, 300.0, 800, 600), Some((0.0, 0.0)));
        assert_eq!(cursor_to_ndc(0.0, 0.0, 800, 600), Some((-1.0, 1.0)));
        assert_eq!(cursor_to_ndc(800.0, 600.0, 800, 600), Some((1.0, -1.0)));
        assert_eq!(cursor_to_ndc(1.0, 1.0, 0, 600), None);
    }

    #[test]
    fn test_pick_star() {
        let world = system();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        let hit = pick(&world, &ray).unwrap();
        assert_eq!(world.get_entity(hit.key).unwrap().name.as_deref(), Some("The Sun"));
        assert!((hit.distance - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_atmosphere_not_pickable() {
        let world = system();
        // Passes through the atmosphere shell (r = 1.2) but misses the star
        let ray = Ray::new(Vec3::new(1.1, 0.0, 10.0), -Vec3::Z);
        assert!(pick(&world, &ray).is_none());
    }

    #[test]
    fn test_nearest_hit_wins() {
        let world = system();
        // Along -x from far out: the planet at x = 3 is hit before the star
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), -Vec3::X);
        let hit = pick(&world, &ray).unwrap();
        assert_eq!(world.get_entity(hit.key).unwrap().name.as_deref(), Some("Blue"));
    }

    #[test]
    fn test_focus_follows_click() {
        let world = system();
        let mut picking = PickingSystem::new();

        let hit = picking.handle_click(&world, &Ray::new(Vec3::new(10.0, 0.0, 0.0), -Vec3::X));
        assert!(hit.is_some());
        assert_eq!(picking.focus_target(&world), Some(Vec3::new(3.0, 0.0, 0.0)));

        // Clicking empty space clears the focus
        picking.handle_click(&world, &Ray::new(Vec3::new(0.0, 50.0, 0.0), Vec3::Y));
        assert!(picking.focused().is_none());
        assert!(picking.focus_target(&world).is_none());
    }

    #[test]
    fn test_removed_focus_is_cleared() {
        let mut world = system();
        let mut picking = PickingSystem::new();
        let key = picking
            .handle_click(&world, &Ray::new(Vec3::new(10.0, 0.0, 0.0), -Vec3::X))
            .unwrap();

        world.remove_entity(key);
        assert!(picking.focus_target(&world).is_none());
        assert!(picking.focused().is_none());
    }
}
