//! Bounding proxies: inset boxes approximating pieces of a part's solid.

use arbor_kernel::{OrientedBox, Point3d, Transform};
use serde::{Deserialize, Serialize};

/// Which piece of the solid a proxy stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProxyRole {
    Panel,
    Plank,
    TubeStraight,
    TubeFillet,
    BandAbove,
    BandBelow,
    /// Solid material between two holes of a row, or past the outermost ones.
    Gap,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingProxy {
    pub role: ProxyRole,
    /// Volume in the part's local frame, already inset.
    pub volume: OrientedBox,
}

impl BoundingProxy {
    pub fn new(role: ProxyRole, volume: OrientedBox) -> Self {
        Self { role, volume }
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            role: self.role,
            volume: self.volume.transformed(t),
        }
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.volume.overlaps(&other.volume)
    }
}

/// A flat bar with a row of holes along its centreline, as seen in its
/// profile frame: X along the bar, Z across it, extruded along +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleRow {
    /// Centre of the first and last hole ends.
    pub start: f64,
    pub end: f64,
    /// Half width of the bar.
    pub outer_radius: f64,
    pub hole_radius: f64,
    pub depth: f64,
}

/// Comb of proxies around a hole row: a band above, a band below and a gap
/// block before, between and after the holes.
///
/// `holes` are centreline spans `(from, to)`; a round hole has `from == to`.
/// Pieces that vanish once the clearance is taken off are skipped.
pub fn comb_proxies(row: &HoleRow, holes: &[(f64, f64)], clearance: f64) -> Vec<BoundingProxy> {
    let mut spans: Vec<(f64, f64)> = holes.to_vec();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let r = row.outer_radius;
    let hr = row.hole_radius;
    let mut proxies = Vec::new();
    let mut push = |role, x0: f64, z0: f64, x1: f64, z1: f64| {
        if x1 - x0 > 2.0 * clearance && z1 - z0 > 2.0 * clearance && row.depth > 2.0 * clearance {
            let volume = OrientedBox::from_corners(
                Point3d::new(x0, 0.0, z0),
                Point3d::new(x1, row.depth, z1),
            )
            .inset(clearance);
            proxies.push(BoundingProxy::new(role, volume));
        }
    };

    push(ProxyRole::BandAbove, row.start, hr, row.end, r);
    push(ProxyRole::BandBelow, row.start, -r, row.end, -hr);

    // Where the rounded bar end is still at least a hole radius tall.
    let reach = (r * r - hr * hr).max(0.0).sqrt();
    let mut cursor = row.start - reach;
    for &(from, to) in &spans {
        push(ProxyRole::Gap, cursor, -hr, from - hr, hr);
        cursor = to + hr;
    }
    push(ProxyRole::Gap, cursor, -hr, row.end + reach, hr);

    proxies
}
