//! Magnetic field lines
//!
//! Loops are laid out like meridians on a sphere. Once animated, every line
//! in the set is redrawn as a wobbling loop whose phase depends on its index
//! in the whole set and on time.

use std::f32::consts::PI;
use orrery_math::Vec3;
use crate::EntityKey;

/// Lines generated per object
pub const DEFAULT_LINE_COUNT: usize = 20;

/// Segments per line (a line has one more point than segments)
pub const DEFAULT_SEGMENTS: usize = 50;

const DEFAULT_BASE_RADIUS: f32 = 1.5;
const DEFAULT_AMPLITUDE: f32 = 0.2;
const DEFAULT_COLOR: [f32; 3] = [1.0, 223.0 / 255.0, 0.0];

/// Build `line_count` meridian loops of radius `radius`
///
/// Point `j` of line `i` sits at polar angle `π·j/segments` and azimuth
/// `2π·i/line_count`.
pub fn generate_loops(radius: f32, line_count: usize, segments: usize) -> Vec<Vec<Vec3>> {
    (0..line_count)
        .map(|i| {
            let theta = i as f32 / line_count as f32 * 2.0 * PI;
            let (sin_t, cos_t) = theta.sin_cos();
            (0..=segments)
                .map(|j| {
                    let phi = j as f32 / segments as f32 * PI;
                    let (sin_p, cos_p) = phi.sin_cos();
                    let r = radius * sin_p;
                    Vec3::new(r * cos_t, radius * cos_p, r * sin_t)
                })
                .collect()
        })
        .collect()
}

/// A polyline in its parent's space
#[derive(Clone, Debug)]
pub struct FieldLine {
    /// Entity whose transform the line follows (None = world space)
    pub parent: Option<EntityKey>,
    pub points: Vec<Vec3>,
}

/// Every field line in the world
#[derive(Clone, Debug)]
pub struct FieldLineSet {
    lines: Vec<FieldLine>,
    /// Mean loop radius used by [`FieldLineSet::animate`]
    pub base_radius: f32,
    /// Wobble amplitude used by [`FieldLineSet::animate`]
    pub amplitude: f32,
    /// Line color (RGB)
    pub color: [f32; 3],
}

impl Default for FieldLineSet {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_RADIUS, DEFAULT_AMPLITUDE)
    }
}

impl FieldLineSet {
    /// Create an empty set with the given animation parameters
    pub fn new(base_radius: f32, amplitude: f32) -> Self {
        Self {
            lines: Vec::new(),
            base_radius,
            amplitude,
            color: DEFAULT_COLOR,
        }
    }

    /// Generate loops around `parent` and add them to the set
    pub fn add_loops(&mut self, parent: Option<EntityKey>, radius: f32, line_count: usize, segments: usize) {
        self.lines.extend(
            generate_loops(radius, line_count, segments)
                .into_iter()
                .map(|points| FieldLine { parent, points }),
        );
    }

    /// All lines, in insertion order
    pub fn lines(&self) -> &[FieldLine] {
        &self.lines
    }

    /// Number of lines
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of points across all lines
    pub fn point_count(&self) -> usize {
        self.lines.iter().map(|l| l.points.len()).sum()
    }

    /// Drop every line attached to `parent`
    pub fn remove_parent(&mut self, parent: EntityKey) {
        self.lines.retain(|l| l.parent != Some(parent));
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Redraw every line for `time` (seconds)
    ///
    /// The azimuth comes from the line's index in the whole set, not within
    /// its parent, and all lines share `base_radius`. Point counts are kept.
    pub fn animate(&mut self, time: f32) {
        let total = self.lines.len() as f32;
        let base = self.base_radius;
        let amplitude = self.amplitude;

        for (i, line) in self.lines.iter_mut().enumerate() {
            let n = line.points.len() as f32;
            let theta = i as f32 / total * 2.0 * PI;
            let (sin_t, cos_t) = theta.sin_cos();

            for (j, point) in line.points.iter_mut().enumerate() {
                let phi = j as f32 / n * PI;
                let (sin_p, cos_p) = phi.sin_cos();
                let r = base + amplitude * (2.0 * theta + time + 5.0 * phi).sin();
                *point = Vec3::new(r * sin_p * cos_t, r * sin_p * sin_t, r * cos_p);
            }
        }
    }
}
