use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::vector::Vec3;

/// Location in a part or world frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        *self + (*other - *self) * 0.5
    }

    pub fn to_vec3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Add<Vec3> for Point3d {
    type Output = Point3d;
    fn add(self, offset: Vec3) -> Point3d {
        Point3d::new(self.x + offset.x, self.y + offset.y, self.z + offset.z)
    }
}

/// Displacement from `from` to `self`.
impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, from: Point3d) -> Vec3 {
        self.to_vec3() - from.to_vec3()
    }
}

impl Sub<Vec3> for Point3d {
    type Output = Point3d;
    fn sub(self, offset: Vec3) -> Point3d {
        self + -offset
    }
}

/// A point in a profile plane.
///
/// Profiles are drawn in the local XZ plane: `x` maps to local X and `y` to
/// local Z. See [`Point2d::on_xz`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

impl Point2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Lift onto the XZ plane at height `y`.
    pub fn on_xz(&self, y: f64) -> Point3d {
        Point3d::new(self.x, y, self.y)
    }
}
