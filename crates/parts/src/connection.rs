//! Connection points: typed attachment locations with two alignment probes.

use arbor_kernel::{Point3d, Transform, Vec3};
use serde::{Deserialize, Serialize};

use crate::types::ConnectionRef;

/// What sort of attachment a connection point is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConnectionKind {
    /// A full panel side.
    Edge { length: f64 },
    /// A round hole or tube end.
    Joint,
    /// An elongated hole.
    Slot { length: f64 },
}

/// One attachment location in the part's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    pub kind: ConnectionKind,
    pub position: Point3d,
    /// Unit direction. Joints and slots point along their bore, edges along
    /// the outward side normal.
    pub axis: Vec3,
    /// The two alignment probes.
    pub probes: [Point3d; 2],
    /// Mate found by the last compatibility sweep.
    #[serde(skip)]
    pub connected_to: Option<ConnectionRef>,
}

impl ConnectionPoint {
    /// A panel side from `start` to `end`. The probes are the side's corners.
    pub fn edge(start: Point3d, end: Point3d, outward: Vec3) -> Self {
        Self {
            kind: ConnectionKind::Edge {
                length: start.distance_to(&end),
            },
            position: start.midpoint(&end),
            axis: outward.normalized_or(Vec3::X),
            probes: [start, end],
            connected_to: None,
        }
    }

    /// A round joint at `position`, probed `spacing` either side along `axis`.
    pub fn joint(position: Point3d, axis: Vec3, spacing: f64) -> Self {
        Self::along_axis(ConnectionKind::Joint, position, axis, spacing)
    }

    pub fn slot(position: Point3d, axis: Vec3, length: f64, spacing: f64) -> Self {
        Self::along_axis(ConnectionKind::Slot { length }, position, axis, spacing)
    }

    fn along_axis(kind: ConnectionKind, position: Point3d, axis: Vec3, spacing: f64) -> Self {
        let axis = axis.normalized_or(Vec3::X);
        Self {
            kind,
            position,
            axis,
            probes: [position + axis * spacing, position - axis * spacing],
            connected_to: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected_to.is_some()
    }

    /// Probes mapped through a part's world transform.
    pub fn world_probes(&self, world: &Transform) -> [Point3d; 2] {
        self.probes.map(|p| world.transform_point(&p))
    }
}

/// Two probe pairs align when they coincide in either order.
pub fn probes_aligned(a: &[Point3d; 2], b: &[Point3d; 2], tolerance: f64) -> bool {
    let close = |p: &Point3d, q: &Point3d| p.distance_to(q) <= tolerance;
    (close(&a[0], &b[0]) && close(&a[1], &b[1])) || (close(&a[0], &b[1]) && close(&a[1], &b[0]))
}
