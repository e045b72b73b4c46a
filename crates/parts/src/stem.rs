//! Stem: a round tube with a single bend, a male connector stub at the far
//! end and a female socket at the origin.
//!
//! The tube runs along +X for `length_pre`, bends through `bend_angle` on a
//! fillet of `fillet_radius` toward +Y (toward -Y when reflected), then runs
//! straight for `length_post`.

use std::f64::consts::{FRAC_PI_2, TAU};

use arbor_kernel::{
    default_tolerance, OrientedBox, Point3d, Primitive, PrimitiveShape, Profile, SolidBody,
    Transform, Vec3,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::connection::ConnectionPoint;
use crate::part::PartGeometry;
use crate::proxy::{BoundingProxy, ProxyRole};
use crate::skeleton::Skeleton;
use crate::types::BuildSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StemParams {
    pub length_pre: f64,
    pub length_post: f64,
    /// Radians.
    pub bend_angle: f64,
    pub fillet_radius: f64,
    pub stem_radius: f64,
    pub connector_radius: f64,
    pub connector_length: f64,
    pub reflected: bool,
}

/// Centreline of a stem, in the stem frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StemPath {
    /// End of the pre-fillet straight.
    pub bend_start: Point3d,
    /// Arc samples after `bend_start`, ending at the start of the post straight.
    /// Empty when the stem is straight.
    pub arc: Vec<Point3d>,
    /// Far end of the tube, where the male stub begins.
    pub end: Point3d,
    /// Unit direction of the post straight.
    pub direction: Vec3,
}

impl StemPath {
    pub fn compute(params: &StemParams, arc_points: usize) -> Self {
        let side = if params.reflected { -1.0 } else { 1.0 };
        let angle = params.bend_angle;
        let radius = params.fillet_radius;
        let bend_start = Point3d::new(params.length_pre, 0.0, 0.0);

        let mut arc = Vec::new();
        if !default_tolerance().is_zero_angle(angle) {
            let samples = ((angle.abs() / TAU) * arc_points as f64).ceil().max(1.0) as usize;
            for i in 1..=samples {
                let phi = angle * i as f64 / samples as f64;
                arc.push(Point3d::new(
                    params.length_pre + radius * phi.sin(),
                    side * radius * (1.0 - phi.cos()),
                    0.0,
                ));
            }
        }

        let direction = Vec3::new(angle.cos(), side * angle.sin(), 0.0);
        let arc_end = arc.last().copied().unwrap_or(bend_start);
        Self {
            bend_start,
            end: arc_end + direction * params.length_post,
            arc,
            direction,
        }
    }

    pub fn arc_end(&self) -> Point3d {
        self.arc.last().copied().unwrap_or(self.bend_start)
    }

    /// Every centreline node from the origin to the far end.
    pub fn nodes(&self) -> Vec<Point3d> {
        let mut nodes = Vec::with_capacity(self.arc.len() + 3);
        nodes.push(Point3d::ORIGIN);
        nodes.push(self.bend_start);
        nodes.extend_from_slice(&self.arc);
        nodes.push(self.end);
        nodes
    }
}

/// Connections: female joint, male joint, then one joint per plate increment
/// along the pre-fillet straight.
///
/// The male joint sits where the stub leaves the tube, so it lines up with
/// the female joint of a stem whose origin sits at this tube's end, which is
/// where the stub is fully seated in that stem's socket.
#[instrument(skip(settings))]
pub fn build_stem(params: &StemParams, settings: &BuildSettings) -> PartGeometry {
    let path = StemPath::compute(params, settings.arc_points);
    let d = path.direction;
    let tip = path.end + d * params.connector_length;
    let n = settings.arc_points;

    let mut body = SolidBody::default();
    body.push(Primitive::new(PrimitiveShape::Tube {
        path: path.nodes(),
        radius: params.stem_radius,
        tessellation: n,
    }));
    body.push(Primitive::new(PrimitiveShape::Tube {
        path: vec![path.end, tip],
        radius: params.connector_radius,
        tessellation: n,
    }));
    body.push(Primitive::new(PrimitiveShape::Tube {
        path: vec![
            Point3d::ORIGIN,
            Point3d::new(params.connector_length, 0.0, 0.0),
        ],
        radius: params.connector_radius,
        tessellation: n,
    }));
    // Flat annulus closing the socket end; the XZ profile plane turns onto YZ.
    body.push(Primitive::placed(
        PrimitiveShape::Extrusion {
            outline: Profile::circle(params.stem_radius, 0.0, 0.0, n),
            holes: vec![Profile::circle(params.connector_radius, 0.0, 0.0, n)],
            depth: 0.0,
        },
        Transform::rotation_z(FRAC_PI_2),
    ));

    let spacing = settings.monitor_spacing;
    let mut connections = vec![
        ConnectionPoint::joint(Point3d::ORIGIN, -Vec3::X, spacing),
        ConnectionPoint::joint(path.end, d, spacing),
    ];
    let step = settings.plate_thickness;
    if step > 0.0 {
        let mut remaining = params.length_pre;
        let mut k = 0usize;
        while remaining >= step {
            let x = (k as f64 + 0.5) * step;
            connections.push(ConnectionPoint::joint(Point3d::new(x, 0.0, 0.0), Vec3::X, spacing));
            remaining -= step;
            k += 1;
        }
    }

    let r = params.stem_radius;
    let c = settings.clearance;
    let mut proxies = vec![BoundingProxy::new(
        ProxyRole::TubeStraight,
        segment_box(&[Point3d::ORIGIN, path.bend_start], [Vec3::X, Vec3::Y, Vec3::Z], r, c),
    )];
    if !path.arc.is_empty() {
        let arc_end = path.arc_end();
        let chord = (arc_end - path.bend_start).normalized_or(Vec3::X);
        let across = Vec3::Z.cross(&chord);
        let mut points = vec![path.bend_start];
        points.extend_from_slice(&path.arc);
        proxies.push(BoundingProxy::new(
            ProxyRole::TubeFillet,
            segment_box(&points, [chord, across, Vec3::Z], r, c),
        ));
    }
    proxies.push(BoundingProxy::new(
        ProxyRole::TubeStraight,
        segment_box(&[path.arc_end(), path.end], [d, Vec3::Z.cross(&d), Vec3::Z], r, c),
    ));

    let mut skeleton = Skeleton::new();
    skeleton.add_chain(&path.nodes());

    debug!(
        joints = connections.len(),
        proxies = proxies.len(),
        "built stem"
    );
    PartGeometry {
        body,
        connections,
        proxies,
        skeleton,
    }
}

/// Box around a run of centreline points, thickened by the tube radius across
/// the run but not along it, then inset.
fn segment_box(points: &[Point3d], axes: [Vec3; 3], radius: f64, clearance: f64) -> OrientedBox {
    let mut b = OrientedBox::enclosing(points, axes);
    b.half_extents = Vec3::new(
        b.half_extents.x,
        b.half_extents.y + radius,
        b.half_extents.z + radius,
    );
    b.inset(clearance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(bend: f64, reflected: bool) -> StemParams {
        StemParams {
            length_pre: 3.5,
            length_post: 2.0,
            bend_angle: bend,
            fillet_radius: 1.0,
            stem_radius: 0.3,
            connector_radius: 0.2,
            connector_length: 0.5,
            reflected,
        }
    }

    #[test]
    fn test_straight_stem() {
        let geo = build_stem(&params(0.0, false), &BuildSettings::default());
        // Two end joints plus three whole plate increments in 3.5.
        assert_eq!(geo.connections.len(), 5);
        assert_eq!(geo.proxies.len(), 2);
        let male = geo.connections[1].position;
        assert_relative_eq!(male.x, 5.5, epsilon = 1e-12);
        assert_relative_eq!(geo.connections[4].position.x, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_quarter_bend_direction() {
        let p = params(FRAC_PI_2, false);
        let path = StemPath::compute(&p, 32);
        assert_eq!(path.arc.len(), 8);
        let arc_end = path.arc_end();
        assert_relative_eq!(arc_end.x, 4.5, epsilon = 1e-12);
        assert_relative_eq!(arc_end.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(path.end.y, 3.0, epsilon = 1e-12);
        assert_relative_eq!(path.direction.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reflected_bends_toward_negative_y() {
        let path = StemPath::compute(&params(FRAC_PI_2, true), 32);
        assert_relative_eq!(path.end.y, -3.0, epsilon = 1e-12);
        assert!(path.arc.iter().all(|p| p.y <= 0.0));
    }

    #[test]
    fn test_bent_stem_has_fillet_proxy() {
        let geo = build_stem(&params(FRAC_PI_2, false), &BuildSettings::default());
        let roles: Vec<ProxyRole> = geo.proxies.iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![ProxyRole::TubeStraight, ProxyRole::TubeFillet, ProxyRole::TubeStraight]
        );
    }

    #[test]
    fn test_female_joint_faces_back() {
        let geo = build_stem(&params(0.3, false), &BuildSettings::default());
        let female = &geo.connections[0];
        assert_eq!(female.position, Point3d::ORIGIN);
        assert_relative_eq!(female.axis.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_male_joint_sits_at_tube_end_of_bent_stem() {
        let p = params(FRAC_PI_2, false);
        let geo = build_stem(&p, &BuildSettings::default());
        let path = StemPath::compute(&p, BuildSettings::default().arc_points);
        let male = &geo.connections[1];
        assert_eq!(male.position, path.end);
        assert_relative_eq!(male.axis.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_proxies_stay_off_the_socket_face() {
        let geo = build_stem(&params(0.0, false), &BuildSettings::default());
        let pre = geo.proxies[0].volume;
        assert_relative_eq!(pre.center.x - pre.half_extents.x, 0.05, epsilon = 1e-12);
        assert_relative_eq!(pre.half_extents.y, 0.25, epsilon = 1e-12);
    }
}
