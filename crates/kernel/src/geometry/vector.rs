use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Direction or displacement in a part or world frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` when shorter than the
    /// coincidence tolerance.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        (len >= crate::default_tolerance().coincidence).then(|| *self / len)
    }

    /// Normalize, falling back to `fallback` for near-zero vectors.
    pub fn normalized_or(&self, fallback: Self) -> Self {
        self.normalized().unwrap_or(fallback)
    }
}

/// Component-wise binary operators between vectors.
macro_rules! componentwise {
    ($($trait:ident $method:ident $op:tt),*) => {$(
        impl $trait for Vec3 {
            type Output = Vec3;
            fn $method(self, rhs: Vec3) -> Vec3 {
                Vec3::new(self.x $op rhs.x, self.y $op rhs.y, self.z $op rhs.z)
            }
        }
    )*};
}

componentwise!(Add add +, Sub sub -);

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, k: f64) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    fn div(self, k: f64) -> Vec3 {
        self * k.recip()
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        self * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert!((a.dot(&b) - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_cross_product() {
        let result = Vec3::X.cross(&Vec3::Y);
        assert!((result.z - 1.0).abs() < 1e-12);
        assert!(result.x.abs() < 1e-12 && result.y.abs() < 1e-12);
    }

    #[test]
    fn test_normalized_or_falls_back_on_zero() {
        assert_eq!(Vec3::ZERO.normalized_or(Vec3::Y), Vec3::Y);
        let n = Vec3::new(3.0, 0.0, 4.0).normalized_or(Vec3::Y);
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!((n.x - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_add_assign_accumulates() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        v += Vec3::new(0.5, -2.0, 1.0);
        assert_eq!(v, Vec3::new(1.5, 0.0, 4.0));
    }
}
