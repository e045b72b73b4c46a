//! Oriented bounding boxes and the separating-axis overlap test.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::transform::{BoundingBox, Transform};
use super::vector::Vec3;

/// Cross products shorter than this come from (nearly) parallel edges and are
/// already covered by the face axes.
const PARALLEL_EPS: f64 = 1e-12;

/// A box with its own orthonormal axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    pub center: Point3d,
    /// Unit axes of the box.
    pub axes: [Vec3; 3],
    /// Half size along each of `axes`. Components may be zero (flat boxes).
    pub half_extents: Vec3,
}

impl OrientedBox {
    /// An axis-aligned box from two opposite corners (any order).
    pub fn from_corners(a: Point3d, b: Point3d) -> Self {
        Self::from_bounds(&BoundingBox::from_points(&[a, b]))
    }

    pub fn from_bounds(bounds: &BoundingBox) -> Self {
        let size = bounds.size();
        Self {
            center: bounds.center(),
            axes: [Vec3::X, Vec3::Y, Vec3::Z],
            half_extents: Vec3::new(
                (size.x * 0.5).max(0.0),
                (size.y * 0.5).max(0.0),
                (size.z * 0.5).max(0.0),
            ),
        }
    }

    /// The tightest box with the given orthonormal `axes` that contains every
    /// point. Returns a degenerate box at the origin for an empty slice.
    pub fn enclosing(points: &[Point3d], axes: [Vec3; 3]) -> Self {
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        for p in points {
            let v = p.to_vec3();
            for (i, axis) in axes.iter().enumerate() {
                let d = v.dot(axis);
                lo[i] = lo[i].min(d);
                hi[i] = hi[i].max(d);
            }
        }
        if points.is_empty() {
            lo = [0.0; 3];
            hi = [0.0; 3];
        }
        let mid = |i: usize| (lo[i] + hi[i]) * 0.5;
        let center = Point3d::ORIGIN + axes[0] * mid(0) + axes[1] * mid(1) + axes[2] * mid(2);
        Self {
            center,
            axes,
            half_extents: Vec3::new(
                (hi[0] - lo[0]) * 0.5,
                (hi[1] - lo[1]) * 0.5,
                (hi[2] - lo[2]) * 0.5,
            ),
        }
    }

    /// Shrink every half extent by `margin`, never below zero.
    pub fn inset(&self, margin: f64) -> Self {
        let h = self.half_extents;
        Self {
            half_extents: Vec3::new(
                (h.x - margin).max(0.0),
                (h.y - margin).max(0.0),
                (h.z - margin).max(0.0),
            ),
            ..*self
        }
    }

    /// Apply a rigid transform.
    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            center: t.transform_point(&self.center),
            axes: self
                .axes
                .map(|axis| t.transform_vector(&axis).normalized_or(axis)),
            half_extents: self.half_extents,
        }
    }

    /// The eight corners.
    pub fn corners(&self) -> [Point3d; 8] {
        let [ax, ay, az] = self.axes;
        let h = self.half_extents;
        let signs = [
            (-1.0, -1.0, -1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, 1.0),
            (1.0, 1.0, 1.0),
            (-1.0, 1.0, 1.0),
        ];
        signs.map(|(sx, sy, sz)| {
            self.center + ax * (sx * h.x) + ay * (sy * h.y) + az * (sz * h.z)
        })
    }

    fn basis(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&self.axes.map(to_na))
    }

    /// True if the interiors of the two boxes overlap.
    ///
    /// Boxes that only touch (shared face, edge or corner) do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        let a = self.basis();
        let b = other.basis();
        let ea = to_na(self.half_extents);
        let eb = to_na(other.half_extents);
        let t = to_na(other.center - self.center);

        let mut candidates = [Vector3::zeros(); 15];
        for i in 0..3 {
            candidates[i] = a.column(i).into_owned();
            candidates[3 + i] = b.column(i).into_owned();
            for j in 0..3 {
                candidates[6 + i * 3 + j] = a.column(i).cross(&b.column(j));
            }
        }

        !candidates
            .iter()
            .filter(|axis| axis.norm_squared() > PARALLEL_EPS)
            .any(|axis| {
                let ra = projected_radius(&a, &ea, axis);
                let rb = projected_radius(&b, &eb, axis);
                t.dot(axis).abs() >= ra + rb - PARALLEL_EPS * axis.norm()
            })
    }
}

fn projected_radius(basis: &Matrix3<f64>, extents: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    (0..3)
        .map(|i| extents[i] * basis.column(i).dot(axis).abs())
        .sum()
}

fn to_na(v: Vec3) -> Vector3<f64> {
    Vector3::new(v.x, v.y, v.z)
}
