//! Rigid placements and axis-aligned bounds.

use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// Homogeneous 4x4 placement. Composition reads right to left: in
/// `a.then(&b)` the transform `b` acts first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(dx, dy, dz)),
        }
    }

    pub fn from_translation_vec(v: Vec3) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    /// Right-handed rotation about world X.
    pub fn rotation_x(angle: f64) -> Self {
        Self {
            matrix: Matrix4::from_axis_angle(&Vector3::x_axis(), angle),
        }
    }

    pub fn rotation_y(angle: f64) -> Self {
        Self {
            matrix: Matrix4::from_axis_angle(&Vector3::y_axis(), angle),
        }
    }

    pub fn rotation_z(angle: f64) -> Self {
        Self {
            matrix: Matrix4::from_axis_angle(&Vector3::z_axis(), angle),
        }
    }

    /// `Rx · Ry · Rz`: rotate about Z first, then Y, then X.
    pub fn rotation_zyx(rx: f64, ry: f64, rz: f64) -> Self {
        Self::rotation_x(rx)
            .then(&Self::rotation_y(ry))
            .then(&Self::rotation_z(rz))
    }

    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        let q = self.matrix.transform_point(&Point3::new(p.x, p.y, p.z));
        Point3d::new(q.x, q.y, q.z)
    }

    /// Rotate a direction; translation is ignored.
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        let w = self.matrix.transform_vector(&Vector3::new(v.x, v.y, v.z));
        Vec3::new(w.x, w.y, w.z)
    }

    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            matrix: self.matrix * other.matrix,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Axis-aligned box. An empty box has `min > max` on every axis and absorbs
/// nothing in [`BoundingBox::union`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn empty() -> Self {
        let inf = f64::INFINITY;
        Self {
            min: Point3d::new(inf, inf, inf),
            max: Point3d::new(-inf, -inf, -inf),
        }
    }

    pub fn from_points(points: &[Point3d]) -> Self {
        points.iter().fold(Self::empty(), |mut bb, p| {
            bb.expand_to_include(p);
            bb
        })
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min = Point3d::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3d::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn union(&self, other: &Self) -> Self {
        if !other.is_valid() {
            return *self;
        }
        let mut out = *self;
        out.expand_to_include(&other.min);
        out.expand_to_include(&other.max);
        out
    }

    pub fn center(&self) -> Point3d {
        self.min.midpoint(&self.max)
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vec3::new(margin, margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Corners with bit 0 of the index selecting max X, bit 1 max Y and bit 2
    /// max Z.
    pub fn corners(&self) -> [Point3d; 8] {
        std::array::from_fn(|i| {
            Point3d::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
