//! 3D Transform (position, rotation, scale)
//!
//! A Transform3D represents the position, rotation, and scale of an entity
//! relative to its parent (or to the world when it has none).

use orrery_math::{mat4, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D transform with position, Euler rotation, and uniform scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Position relative to the parent
    pub position: Vec3,
    /// Rotation as Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale: 1.0,
        }
    }

    /// Get the rotation matrix
    #[inline]
    pub fn rotation_matrix(&self) -> Mat4 {
        mat4::from_euler_xyz(self.rotation)
    }

    /// Local-to-parent matrix: translation, then rotation, then scale (`T·R·S`)
    pub fn to_matrix(&self) -> Mat4 {
        let tr = mat4::mul(&mat4::translation(self.position), &self.rotation_matrix());
        mat4::mul(&tr, &mat4::scale(Vec3::splat(self.scale)))
    }

    /// Transform a point from local space to parent space
    ///
    /// Applies scale, then rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let rotated = mat4::transform_vector(&self.rotation_matrix(), p * self.scale);
        rotated + self.position
    }

    /// Transform a direction (no translation)
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        mat4::transform_vector(&self.rotation_matrix(), d * self.scale)
    }

    /// Matrix of `child` placed under this transform (`self · child`)
    pub fn compose(&self, child: &Transform3D) -> Mat4 {
        mat4::mul(&self.to_matrix(), &child.to_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity() {
        let t = Transform3D::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(t.transform_point(p), p);
        assert_eq!(t.to_matrix(), mat4::IDENTITY);
    }

    #[test]
    fn test_translation() {
        let t = Transform3D::from_position(Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(t.transform_point(Vec3::ZERO), Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(t.transform_direction(Vec3::X), Vec3::X);
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let t = Transform3D {
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
            scale: 2.0,
        };
        // X scaled to 2, rotated about Y to -Z, lifted by 1
        let p = t.transform_point(Vec3::X);
        assert!(approx_eq(p, Vec3::new(0.0, 1.0, -2.0)), "got {:?}", p);
    }

    #[test]
    fn test_matrix_agrees_with_transform_point() {
        let t = Transform3D {
            position: Vec3::new(5.0, -2.0, 1.0),
            rotation: Vec3::new(0.3, 1.1, -0.7),
            scale: 0.5,
        };
        let p = Vec3::new(0.4, -1.2, 2.0);
        let via_matrix = mat4::transform_point(&t.to_matrix(), p);
        assert!(approx_eq(via_matrix, t.transform_point(p)));
    }

    #[test]
    fn test_compose_parent_child() {
        let parent = Transform3D::from_position_rotation(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, FRAC_PI_2, 0.0),
        );
        let child = Transform3D::from_position(Vec3::new(1.0, 0.0, 0.0));
        let world = parent.compose(&child);
        let origin = mat4::transform_point(&world, Vec3::ZERO);
        // Child offset rotates with the parent
        assert!(approx_eq(origin, Vec3::new(3.0, 0.0, -1.0)), "got {:?}", origin);
    }
}
