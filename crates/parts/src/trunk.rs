//! Trunk: a plank with upright perforated ribs standing on it.

use std::f64::consts::FRAC_PI_2;

use arbor_kernel::{
    OrientedBox, Point3d, Primitive, PrimitiveShape, Profile, SolidBody, Transform, Vec3,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::connection::ConnectionPoint;
use crate::part::PartGeometry;
use crate::proxy::{comb_proxies, BoundingProxy, HoleRow, ProxyRole};
use crate::skeleton::Skeleton;
use crate::types::BuildSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrunkParams {
    /// Plank size along X.
    pub length: f64,
    /// Plank size along Z.
    pub width: f64,
    pub thickness: f64,
    pub rib_count: usize,
    /// Half height of each rib.
    pub rib_radius: f64,
    pub rib_thickness: f64,
    /// Gap between neighbouring ribs.
    pub rib_spacing: f64,
    /// Distance from the reference plank edge to the first rib.
    pub edge_distance: f64,
    pub hole_radius: f64,
    pub hole_spacing: f64,
    pub reflected: bool,
}

impl TrunkParams {
    /// Low-Z face of rib `i`. Ribs count from the `z = 0` edge, or from the
    /// `z = width` edge when reflected.
    pub fn rib_offset(&self, i: usize) -> f64 {
        let pitch = self.rib_thickness + self.rib_spacing;
        if self.reflected {
            self.width - self.edge_distance - self.rib_thickness - i as f64 * pitch
        } else {
            self.edge_distance + i as f64 * pitch
        }
    }

    /// Hole centres along a rib, starting over the rib's left end centre.
    pub fn hole_positions(&self) -> Vec<f64> {
        let first = self.rib_radius;
        let last = self.length - self.rib_radius;
        if self.hole_spacing <= 0.0 {
            return if last >= first { vec![first] } else { Vec::new() };
        }
        let mut xs = Vec::new();
        let mut x = first;
        while x <= last + 1e-9 {
            xs.push(x);
            x += self.hole_spacing;
        }
        xs
    }

    /// Maps the rib profile frame onto the trunk frame: the profile plane
    /// stands upright and the extrusion runs along -Z from the rib's high face.
    fn rib_placement(&self, i: usize) -> Transform {
        Transform::translation(
            0.0,
            self.thickness + self.rib_radius,
            self.rib_offset(i) + self.rib_thickness,
        )
        .then(&Transform::rotation_x(-FRAC_PI_2))
    }
}

/// Connections: one joint per rib hole, rib by rib.
#[instrument(skip(settings))]
pub fn build_trunk(params: &TrunkParams, settings: &BuildSettings) -> PartGeometry {
    let n = settings.arc_points;
    let rr = params.rib_radius;
    let holes = params.hole_positions();
    let spacing = settings.monitor_spacing;

    let mut body = SolidBody::new(vec![Primitive::new(PrimitiveShape::Panel {
        width: params.length,
        height: params.width,
        thickness: params.thickness,
    })]);
    let plank = OrientedBox::from_corners(
        Point3d::ORIGIN,
        Point3d::new(params.length, params.thickness, params.width),
    );
    let mut proxies = vec![BoundingProxy::new(
        ProxyRole::Plank,
        plank.inset(settings.clearance),
    )];
    let mut connections = Vec::new();
    let mut skeleton = Skeleton::new();
    let mid = params.thickness * 0.5;
    skeleton.add_loop(&[
        Point3d::new(0.0, mid, 0.0),
        Point3d::new(params.length, mid, 0.0),
        Point3d::new(params.length, mid, params.width),
        Point3d::new(0.0, mid, params.width),
    ]);

    let row = HoleRow {
        start: rr,
        end: params.length - rr,
        outer_radius: rr,
        hole_radius: params.hole_radius,
        depth: params.rib_thickness,
    };
    let spans: Vec<(f64, f64)> = holes.iter().map(|&x| (x, x)).collect();

    for i in 0..params.rib_count {
        let placement = params.rib_placement(i);
        body.push(Primitive::placed(
            PrimitiveShape::Extrusion {
                outline: Profile::pill(rr, params.length - 2.0 * rr, rr, 0.0, n),
                holes: holes
                    .iter()
                    .map(|&x| Profile::circle(params.hole_radius, x, 0.0, n))
                    .collect(),
                depth: params.rib_thickness,
            },
            placement,
        ));

        let axis = placement.transform_vector(&Vec3::Y);
        let centres: Vec<Point3d> = holes
            .iter()
            .map(|&x| placement.transform_point(&Point3d::new(x, params.rib_thickness * 0.5, 0.0)))
            .collect();
        connections.extend(centres.iter().map(|&c| ConnectionPoint::joint(c, axis, spacing)));
        skeleton.add_chain(&centres);

        proxies.extend(
            comb_proxies(&row, &spans, settings.clearance)
                .iter()
                .map(|p| p.transformed(&placement)),
        );
    }

    debug!(
        ribs = params.rib_count,
        joints = connections.len(),
        proxies = proxies.len(),
        "built trunk"
    );
    PartGeometry {
        body,
        connections,
        proxies,
        skeleton,
    }
}
