//! Branch: a flat pill-shaped bar with a round hole at each end and a row of
//! slots between them.

use arbor_kernel::{default_tolerance, Point3d, Primitive, PrimitiveShape, Profile, SolidBody, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::connection::ConnectionPoint;
use crate::part::PartGeometry;
use crate::proxy::{comb_proxies, HoleRow};
use crate::skeleton::Skeleton;
use crate::types::BuildSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchParams {
    /// Distance between the two end hole centres.
    pub length: f64,
    pub thickness: f64,
    pub outer_radius: f64,
    pub hole_radius: f64,
    pub hole_spacing: f64,
    pub slot_length: f64,
    pub reflected: bool,
}

/// One slot along the bar: its centreline starts at `start` and runs for
/// `length`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub start: f64,
    pub length: f64,
}

impl Slot {
    pub fn end(&self) -> f64 {
        self.start + self.length
    }
}

/// Slots between the end holes, in placement order.
///
/// Full-length slots are laid from the left, each separated from its
/// neighbours by `spacing`. Whatever is left after the last full slot and its
/// trailing spacing becomes a shorter slot, unless negative. A zero remainder
/// gives a zero-length slot, which is a round hole one spacing from the end
/// hole. Reflected bars mirror the whole layout so the short slot sits at the
/// left end.
pub fn slot_layout(length: f64, spacing: f64, slot_length: f64, reflected: bool) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut remaining = length - 2.0 * spacing;
    let mut start = spacing;
    if slot_length > 0.0 && slot_length + spacing > 0.0 {
        while remaining >= slot_length {
            slots.push(Slot {
                start,
                length: slot_length,
            });
            remaining -= slot_length + spacing;
            start += slot_length + spacing;
        }
    }
    if remaining >= -default_tolerance().coincidence {
        slots.push(Slot {
            start,
            length: remaining.max(0.0),
        });
    }

    if reflected {
        for slot in &mut slots {
            slot.start = length - slot.start - slot.length;
        }
    }
    slots
}

/// The bar lies along +X in the XZ plane and is extruded by `thickness` along
/// +Y. Connections: left joint, slots in placement order, right joint.
#[instrument(skip(settings))]
pub fn build_branch(params: &BranchParams, settings: &BuildSettings) -> PartGeometry {
    let n = settings.arc_points;
    let length = params.length;
    let r = params.hole_radius;
    let slots = slot_layout(length, params.hole_spacing, params.slot_length, params.reflected);

    let mut holes = vec![Profile::circle(r, 0.0, 0.0, n)];
    holes.extend(slots.iter().map(|s| Profile::pill(r, s.length, s.start, 0.0, n)));
    holes.push(Profile::circle(r, length, 0.0, n));

    let body = SolidBody::new(vec![Primitive::new(PrimitiveShape::Extrusion {
        outline: Profile::pill(params.outer_radius, length, 0.0, 0.0, n),
        holes,
        depth: params.thickness,
    })]);

    let mid = params.thickness * 0.5;
    let spacing = settings.monitor_spacing;
    let mut connections = vec![ConnectionPoint::joint(Point3d::new(0.0, mid, 0.0), Vec3::Y, spacing)];
    connections.extend(slots.iter().map(|s| {
        ConnectionPoint::slot(
            Point3d::new(s.start + s.length * 0.5, mid, 0.0),
            Vec3::Y,
            s.length,
            spacing,
        )
    }));
    connections.push(ConnectionPoint::joint(Point3d::new(length, mid, 0.0), Vec3::Y, spacing));

    let mut spans = vec![(0.0, 0.0)];
    spans.extend(slots.iter().map(|s| (s.start, s.end())));
    spans.push((length, length));
    let row = HoleRow {
        start: 0.0,
        end: length,
        outer_radius: params.outer_radius,
        hole_radius: r,
        depth: params.thickness,
    };
    let proxies = comb_proxies(&row, &spans, settings.clearance);

    let mut skeleton = Skeleton::new();
    let mut centres: Vec<Point3d> = connections.iter().map(|c| c.position).collect();
    centres.sort_by(|a, b| a.x.total_cmp(&b.x));
    skeleton.add_chain(&centres);

    debug!(slots = slots.len(), proxies = proxies.len(), "built branch");
    PartGeometry {
        body,
        connections,
        proxies,
        skeleton,
    }
}
