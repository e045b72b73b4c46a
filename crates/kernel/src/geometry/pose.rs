use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::transform::Transform;
use super::vector::Vec3;

/// Placement of a part: a position plus three independent axis rotations.
///
/// Rotations are stored as accumulated angles (radians) rather than a
/// quaternion. The world transform applies them in the fixed order Z, Y, X,
/// each about the world axes, then translates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3d,
    /// Rotation angles about X, Y and Z.
    pub rotation: Vec3,
}

impl Pose {
    pub fn new(position: Point3d, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3d::new(x, y, z),
            rotation: Vec3::ZERO,
        }
    }

    /// Add a translation delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position = self.position + delta;
    }

    /// Add a rotation delta (radians about X, Y, Z).
    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation += delta;
    }

    /// Local-to-world transform.
    pub fn transform(&self) -> Transform {
        let r = self.rotation;
        Transform::from_translation_vec(self.position.to_vec3())
            .then(&Transform::rotation_zyx(r.x, r.y, r.z))
    }
}
