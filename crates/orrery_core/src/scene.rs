//! Scene serialization
//!
//! A [`SystemScene`] describes a star system: the star and its atmosphere,
//! the planets, the asteroid belt, the background stars, the dust, the field
//! lines, and the lights. Scenes are loaded from and saved to RON files.
//! Every section falls back to its default, so a scene file only needs the
//! parts it changes.

use std::fs;
use std::io;
use std::path::Path;

use orrery_math::Vec3;
use serde::{Deserialize, Serialize};

/// The central star and its atmosphere shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarTemplate {
    pub name: String,
    pub radius: f32,
    /// Sphere segments
    pub segments: u32,
    /// Emissive color as 0xRRGGBB
    pub color: u32,
    pub emissive_intensity: f32,
    /// Mass in kilograms
    pub mass: f64,
    pub atmosphere_radius: f32,
    pub atmosphere_color: u32,
    pub atmosphere_opacity: f32,
    /// Radius of the star's field-line loops
    pub field_line_radius: f32,
}

impl Default for StarTemplate {
    fn default() -> Self {
        Self {
            name: "The Sun".to_string(),
            radius: 1.0,
            segments: 64,
            color: 0xffdf00,
            emissive_intensity: 1.0,
            mass: 1.989e30,
            atmosphere_radius: 1.2,
            atmosphere_color: 0xffdf00,
            atmosphere_opacity: 0.3,
            field_line_radius: 1.5,
        }
    }
}

/// One planet on a circular orbit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetTemplate {
    /// Display name; the info panel shows "Unknown" when absent
    pub name: Option<String>,
    /// Sphere radius
    pub size: f32,
    /// Base color as 0xRRGGBB
    pub color: u32,
    /// Orbit radius
    pub distance: f32,
    /// Orbit angle added per frame (radians)
    pub speed: f32,
    /// Mass in kilograms
    pub mass: f64,
    pub roughness: f32,
    pub metalness: f32,
    /// Rotation about Y added per frame (radians)
    pub spin: f32,
    pub segments: u32,
}

impl Default for PlanetTemplate {
    fn default() -> Self {
        Self {
            name: None,
            size: 0.2,
            color: 0x3399ff,
            distance: 3.0,
            speed: 0.004,
            mass: 5.972e24,
            roughness: 0.7,
            metalness: 0.1,
            spin: 0.01,
            segments: 64,
        }
    }
}

impl PlanetTemplate {
    /// Create an unnamed planet with the default surface
    pub fn new(size: f32, color: u32, distance: f32, speed: f32, mass: f64) -> Self {
        Self {
            size,
            color,
            distance,
            speed,
            mass,
            ..Self::default()
        }
    }

    /// Set the planet's name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// The asteroid belt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeltTemplate {
    pub count: usize,
    /// Smallest orbit radius
    pub inner_distance: f32,
    /// Orbit radii are spread over `[inner, inner + spread)`
    pub distance_spread: f32,
    pub min_size: f32,
    /// Sizes are spread over `[min, min + spread)`
    pub size_spread: f32,
    /// Ring tilt (radians)
    pub tilt: f32,
    /// Angle added per frame (radians)
    pub angular_step: f32,
    pub color: u32,
    pub roughness: f32,
    pub metalness: f32,
    /// Segments of the spherical asteroids
    pub sphere_segments: u32,
}

impl Default for BeltTemplate {
    fn default() -> Self {
        Self {
            count: 3000,
            inner_distance: 8.0,
            distance_spread: 2.0,
            min_size: 0.01,
            size_spread: 0.02,
            tilt: std::f32::consts::FRAC_PI_4,
            angular_step: 0.001,
            color: 0x505050,
            roughness: 0.8,
            metalness: 0.2,
            sphere_segments: 8,
        }
    }
}

/// Background stars scattered in a cube around the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundTemplate {
    pub count: usize,
    /// Half side of the cube
    pub extent: f32,
    pub radius: f32,
    pub segments: u32,
    pub color: u32,
}

impl Default for BackgroundTemplate {
    fn default() -> Self {
        Self {
            count: 1000,
            extent: 100.0,
            radius: 0.05,
            segments: 24,
            color: 0xffffff,
        }
    }
}

/// Dust points scattered in a cube around the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DustTemplate {
    pub count: usize,
    /// Half side of the cube
    pub extent: f32,
    pub point_size: f32,
    pub color: u32,
}

impl Default for DustTemplate {
    fn default() -> Self {
        Self {
            count: 2000,
            extent: 100.0,
            point_size: 0.1,
            color: 0xffffff,
        }
    }
}

/// Magnetic field-line layout and animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLineTemplate {
    /// Loops generated per object
    pub line_count: usize,
    /// Segments per loop
    pub segments: usize,
    /// Planet loop radius as a multiple of the planet size
    pub planet_radius_factor: f32,
    /// Mean radius of animated loops
    pub base_radius: f32,
    /// Wobble amplitude of animated loops
    pub amplitude: f32,
    /// Line color as 0xRRGGBB
    pub color: u32,
}

impl Default for FieldLineTemplate {
    fn default() -> Self {
        Self {
            line_count: 20,
            segments: 50,
            planet_radius_factor: 2.0,
            base_radius: 1.5,
            amplitude: 0.2,
            color: 0xffdf00,
        }
    }
}

/// A light shining from a direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: u32,
    pub intensity: f32,
    /// Light position; it shines towards the origin
    pub position: Vec3,
}

/// A light radiating from a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
}

/// Every light in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lighting {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub directional: Option<DirectionalLight>,
    pub points: Vec<PointLight>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_color: 0xffffff,
            ambient_intensity: 0.3,
            directional: Some(DirectionalLight {
                color: 0xffdf00,
                intensity: 1.5,
                position: Vec3::new(5.0, 5.0, 5.0),
            }),
            points: vec![
                PointLight {
                    color: 0xffffff,
                    intensity: 0.3,
                    position: Vec3::new(10.0, 10.0, 10.0),
                },
                PointLight {
                    color: 0xffffff,
                    intensity: 0.3,
                    position: Vec3::new(-10.0, -10.0, -10.0),
                },
            ],
        }
    }
}

/// A serializable star system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemScene {
    /// Scene name (for display/debugging)
    pub name: String,
    /// RNG seed for the belt, starfield, and dust (None = fresh entropy)
    pub seed: Option<u64>,
    pub star: StarTemplate,
    pub planets: Vec<PlanetTemplate>,
    pub asteroid_belt: BeltTemplate,
    pub background_stars: BackgroundTemplate,
    pub space_dust: DustTemplate,
    pub field_lines: FieldLineTemplate,
    pub lighting: Lighting,
    /// Where the camera starts; it looks at the origin
    pub camera_position: Vec3,
}

impl Default for SystemScene {
    fn default() -> Self {
        Self {
            name: "Solar System".to_string(),
            seed: None,
            star: StarTemplate::default(),
            planets: vec![
                PlanetTemplate::new(0.2, 0x3399ff, 3.0, 0.004, 5.972e24),
                PlanetTemplate::new(0.3, 0xff9933, 5.0, 0.00016, 6.39e23),
                PlanetTemplate::new(0.25, 0x99ff33, 7.0, 0.00012, 4.867e24),
            ],
            asteroid_belt: BeltTemplate::default(),
            background_stars: BackgroundTemplate::default(),
            space_dust: DustTemplate::default(),
            field_lines: FieldLineTemplate::default(),
            lighting: Lighting::default(),
            camera_position: Vec3::new(10.0, 10.0, 10.0),
        }
    }
}

impl SystemScene {
    /// Create a scene with a default star and no planets
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            planets: Vec::new(),
            ..Self::default()
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        let scene = ron::from_str(&contents)?;
        Ok(scene)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Add a planet to this scene
    pub fn add_planet(&mut self, planet: PlanetTemplate) {
        self.planets.push(planet);
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {}

/// Error saving a scene
#[derive(Debug)]
pub enum SceneSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "IO error: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {}
