//! Leaf: a flat rectangular panel joined edge to edge with other leaves.

use arbor_kernel::{OrientedBox, Point3d, Primitive, PrimitiveShape, SolidBody, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::connection::ConnectionPoint;
use crate::part::PartGeometry;
use crate::proxy::{BoundingProxy, ProxyRole};
use crate::skeleton::Skeleton;
use crate::types::BuildSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafParams {
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
}

/// Panel spanning `x ∈ [0, width]`, `z ∈ [0, height]`, `y ∈ [0, thickness]`.
///
/// Connections are the four sides in the order bottom, right, top, left.
#[instrument(skip(settings))]
pub fn build_leaf(params: &LeafParams, settings: &BuildSettings) -> PartGeometry {
    let LeafParams {
        width: w,
        height: h,
        thickness: t,
    } = *params;
    let mid = t * 0.5;
    let corners = [
        Point3d::new(0.0, mid, 0.0),
        Point3d::new(w, mid, 0.0),
        Point3d::new(w, mid, h),
        Point3d::new(0.0, mid, h),
    ];

    let connections = vec![
        ConnectionPoint::edge(corners[0], corners[1], -Vec3::Z),
        ConnectionPoint::edge(corners[1], corners[2], Vec3::X),
        ConnectionPoint::edge(corners[2], corners[3], Vec3::Z),
        ConnectionPoint::edge(corners[3], corners[0], -Vec3::X),
    ];

    let panel = OrientedBox::from_corners(Point3d::ORIGIN, Point3d::new(w, t, h));
    let proxies = vec![BoundingProxy::new(
        ProxyRole::Panel,
        panel.inset(settings.clearance),
    )];

    let mut skeleton = Skeleton::new();
    skeleton.add_loop(&corners);

    let body = SolidBody::new(vec![Primitive::new(PrimitiveShape::Panel {
        width: w,
        height: h,
        thickness: t,
    })]);

    debug!(connections = connections.len(), "built leaf");
    PartGeometry {
        body,
        connections,
        proxies,
        skeleton,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionKind;

    #[test]
    fn test_leaf_edges_in_order() {
        let geo = build_leaf(
            &LeafParams {
                width: 4.0,
                height: 2.0,
                thickness: 0.5,
            },
            &BuildSettings::default(),
        );
        assert_eq!(geo.connections.len(), 4);
        let axes: Vec<Vec3> = geo.connections.iter().map(|c| c.axis).collect();
        assert_eq!(axes, vec![-Vec3::Z, Vec3::X, Vec3::Z, -Vec3::X]);
        assert_eq!(geo.connections[0].kind, ConnectionKind::Edge { length: 4.0 });
        assert_eq!(geo.connections[1].kind, ConnectionKind::Edge { length: 2.0 });
        assert_eq!(geo.connections[2].position, Point3d::new(2.0, 0.25, 2.0));
    }

    #[test]
    fn test_leaf_proxy_is_inset() {
        let geo = build_leaf(
            &LeafParams {
                width: 4.0,
                height: 2.0,
                thickness: 0.5,
            },
            &BuildSettings::default(),
        );
        assert_eq!(geo.proxies.len(), 1);
        let h = geo.proxies[0].volume.half_extents;
        assert!((h.x - 1.95).abs() < 1e-12);
        assert!((h.y - 0.2).abs() < 1e-12);
        assert!((h.z - 0.95).abs() < 1e-12);
        assert_eq!(geo.skeleton.members.len(), 4);
    }
}
