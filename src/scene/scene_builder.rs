//! SceneBuilder - Declarative system construction
//!
//! Provides a fluent API for building a star system into a [`World`].

use orrery_core::procedural::{asteroid_belt, background_stars, space_dust};
use orrery_core::{
    rgb_from_hex, BackgroundTemplate, BeltTemplate, BodyKind, CircularOrbit, DustTemplate,
    Entity, EntityKey, FieldLineTemplate, GravityBody, GravityConfig, Lighting, Material,
    MeshKind, PlanetTemplate, StarTemplate, SystemScene, World,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Builder for constructing a star system
///
/// # Example
/// ```ignore
/// let world = SceneBuilder::with_seed(42)
///     .with_gravity(GravityConfig::default())
///     .add_star(&StarTemplate::default())
///     .add_planet(&PlanetTemplate::new(0.2, 0x3399ff, 3.0, 0.004, 5.972e24))
///     .add_asteroid_belt(&BeltTemplate::default())
///     .build();
/// ```
pub struct SceneBuilder {
    world: World,
    rng: StdRng,
    field_lines: FieldLineTemplate,
    star: Option<EntityKey>,
}

impl SceneBuilder {
    /// Create a builder drawing its random placement from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a builder with a reproducible random placement
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut builder = Self {
            world: World::new(),
            rng,
            field_lines: FieldLineTemplate::default(),
            star: None,
        };
        builder.apply_field_line_style();
        builder
    }

    /// Build the whole system described by a scene
    ///
    /// `seed_override` replaces the scene's seed when set.
    pub fn from_scene(scene: &SystemScene, gravity: GravityConfig, seed_override: Option<u64>) -> World {
        let builder = match seed_override.or(scene.seed) {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        };

        let mut builder = builder
            .with_gravity(gravity)
            .with_field_lines(scene.field_lines.clone())
            .with_lighting(scene.lighting.clone())
            .add_star(&scene.star);

        for planet in &scene.planets {
            builder = builder.add_planet(planet);
        }

        builder
            .add_asteroid_belt(&scene.asteroid_belt)
            .add_background_stars(&scene.background_stars)
            .add_space_dust(&scene.space_dust)
            .build()
    }

    /// Enable mutual gravity; planets added afterwards get gravity bodies
    pub fn with_gravity(mut self, config: GravityConfig) -> Self {
        self.world = self.world.with_gravity(config);
        self
    }

    /// Set the field-line layout, animation, and color
    pub fn with_field_lines(mut self, template: FieldLineTemplate) -> Self {
        self.field_lines = template;
        self.apply_field_line_style();
        self
    }

    /// Set the scene lighting
    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.world.lighting = lighting;
        self
    }

    fn apply_field_line_style(&mut self) {
        let lines = &mut self.world.field_lines;
        lines.base_radius = self.field_lines.base_radius;
        lines.amplitude = self.field_lines.amplitude;
        lines.color = rgb_from_hex(self.field_lines.color);
    }

    /// Add the star, its atmosphere shell, and its field lines
    pub fn add_star(mut self, star: &StarTemplate) -> Self {
        let mesh = MeshKind::Sphere { segments: star.segments };

        let star_key = self.world.add_entity(
            Entity::new(BodyKind::Star, mesh)
                .with_name(star.name.clone())
                .with_tag("star")
                .with_size(star.radius)
                .with_pick_radius(star.radius)
                .with_material(Material::emissive(star.color, star.emissive_intensity)),
        );

        self.world.add_entity(
            Entity::new(BodyKind::Atmosphere, mesh)
                .with_tag("atmosphere")
                .with_parent(star_key)
                .with_size(star.atmosphere_radius)
                .with_material(Material::transparent(star.atmosphere_color, star.atmosphere_opacity)),
        );

        self.world.field_lines.add_loops(
            Some(star_key),
            star.field_line_radius,
            self.field_lines.line_count,
            self.field_lines.segments,
        );

        self.star = Some(star_key);
        self
    }

    /// Add a planet on a circular orbit, with its field lines
    ///
    /// When gravity is enabled the planet also gets a gravity body at its
    /// starting position.
    pub fn add_planet(mut self, planet: &PlanetTemplate) -> Self {
        let orbit = CircularOrbit::new(planet.distance, planet.speed);

        let mut entity = Entity::new(BodyKind::Planet, MeshKind::Sphere { segments: planet.segments })
            .with_tag("planet")
            .with_size(planet.size)
            .with_pick_radius(planet.size)
            .with_material(Material::standard(planet.color, planet.roughness, planet.metalness))
            .with_orbit(orbit)
            .with_spin(planet.spin);

        if let Some(name) = &planet.name {
            entity = entity.with_name(name.clone());
        }

        if let Some(gravity) = self.world.gravity_mut() {
            let body = gravity.add_body(GravityBody::new(orbit.position(), planet.mass));
            entity = entity.with_gravity_body(body);
        }

        let key = self.world.add_entity(entity);
        self.world.field_lines.add_loops(
            Some(key),
            planet.size * self.field_lines.planet_radius_factor,
            self.field_lines.line_count,
            self.field_lines.segments,
        );

        self
    }

    /// Add the asteroid belt
    pub fn add_asteroid_belt(mut self, belt: &BeltTemplate) -> Self {
        for asteroid in asteroid_belt(&mut self.rng, belt) {
            self.world.add_entity(asteroid.with_tag("asteroid"));
        }
        self
    }

    /// Add the background star spheres
    pub fn add_background_stars(mut self, stars: &BackgroundTemplate) -> Self {
        for star in background_stars(&mut self.rng, stars) {
            self.world.add_entity(star.with_tag("background"));
        }
        self
    }

    /// Add a dust cloud
    pub fn add_space_dust(mut self, dust: &DustTemplate) -> Self {
        let cloud = space_dust(&mut self.rng, dust);
        self.world.particles.push(cloud);
        self
    }

    /// Add a custom entity to the scene
    pub fn add_entity(mut self, entity: Entity) -> Self {
        self.world.add_entity(entity);
        self
    }

    /// Key of the star, once added
    pub fn star(&self) -> Option<EntityKey> {
        self.star
    }

    /// Build the scene and return the configured World
    pub fn build(self) -> World {
        log::debug!(
            "Built world: {} entities, {} field lines, {} particle clouds",
            self.world.entity_count(),
            self.world.field_lines.len(),
            self.world.particles.len()
        );
        self.world
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}
