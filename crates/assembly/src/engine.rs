//! Per-frame sweeps: which parts collide and which connectors line up.
//!
//! Both sweeps are pairwise over the live, visible parts and cost
//! O(parts² × proxies²) and O(parts² × connections²) respectively.

use std::collections::BTreeSet;

use arbor_kernel::{OrientedBox, Point3d};
use arbor_parts::{probes_aligned, BoundingProxy, ConnectionRef, Part, PartId};
use tracing::{debug, instrument};

/// World-space data one part contributes to the sweeps.
pub struct SweepEntry<'a> {
    pub id: PartId,
    pub part: &'a Part,
    hull: OrientedBox,
    proxies: Vec<BoundingProxy>,
    probes: Vec<[Point3d; 2]>,
}

impl<'a> SweepEntry<'a> {
    pub fn new(id: PartId, part: &'a Part) -> Self {
        Self {
            id,
            part,
            hull: part.world_hull(),
            proxies: part.world_proxies(),
            probes: part.world_probes(),
        }
    }
}

/// True if the two parts collide: their full-solid hulls overlap and at least
/// one pair of their proxies does.
pub fn parts_intersect(a: &Part, b: &Part) -> bool {
    entries_intersect(&SweepEntry::new(PartId(0), a), &SweepEntry::new(PartId(0), b))
}

fn entries_intersect(a: &SweepEntry<'_>, b: &SweepEntry<'_>) -> bool {
    a.hull.overlaps(&b.hull)
        && a
            .proxies
            .iter()
            .any(|pa| b.proxies.iter().any(|pb| pa.overlaps(pb)))
}

/// Unordered pairs of colliding parts, smaller id first.
#[instrument(skip_all, fields(parts = entries.len()))]
pub fn intersection_sweep(entries: &[SweepEntry<'_>]) -> BTreeSet<(PartId, PartId)> {
    let mut pairs = BTreeSet::new();
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            if entries_intersect(a, b) {
                pairs.insert(ordered(a.id, b.id));
            }
        }
    }
    debug!(pairs = pairs.len(), "intersection sweep");
    pairs
}

/// For every connection of every entry, the first compatible, aligned
/// connection on another part, scanning parts in order and then their
/// connections in order. Result is indexed like `entries` and their
/// connection lists.
#[instrument(skip_all, fields(parts = entries.len()))]
pub fn compatibility_sweep(
    entries: &[SweepEntry<'_>],
    colliding: &BTreeSet<(PartId, PartId)>,
    tolerance: f64,
) -> Vec<Vec<Option<ConnectionRef>>> {
    let mut matched = 0usize;
    let result: Vec<Vec<Option<ConnectionRef>>> = entries
        .iter()
        .map(|a| {
            a.probes
                .iter()
                .map(|probe| {
                    let found = entries
                        .iter()
                        .filter(|b| b.id != a.id)
                        .filter(|b| a.part.kind().can_mate(b.part.kind()))
                        .filter(|b| !colliding.contains(&ordered(a.id, b.id)))
                        .find_map(|b| {
                            b.probes
                                .iter()
                                .position(|other| probes_aligned(probe, other, tolerance))
                                .map(|index| ConnectionRef { part: b.id, index })
                        });
                    if found.is_some() {
                        matched += 1;
                    }
                    found
                })
                .collect()
        })
        .collect();
    debug!(matched, "compatibility sweep");
    result
}

fn ordered(a: PartId, b: PartId) -> (PartId, PartId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
