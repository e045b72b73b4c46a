//! Geometry kernel for the part catalog: math types, profile generation and
//! primitive solid descriptions.

pub mod geometry;
pub mod primitives;
pub mod profile;

pub use geometry::obb::OrientedBox;
pub use geometry::point::{Point2d, Point3d};
pub use geometry::pose::Pose;
pub use geometry::transform::{BoundingBox, Transform};
pub use geometry::vector::Vec3;
pub use primitives::{Primitive, PrimitiveShape, SolidBody};
pub use profile::{pill_profile, Profile};

/// Thresholds for treating small geometric quantities as zero.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Vectors shorter than this have no direction.
    pub coincidence: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            angular: 1e-10,
        }
    }
}

impl Tolerance {
    pub fn is_zero_angle(&self, angle: f64) -> bool {
        angle.abs() < self.angular
    }
}

/// The default tolerance.
pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
