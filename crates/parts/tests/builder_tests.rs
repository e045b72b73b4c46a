//! Integration tests for the part builders and the connection rules.

use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use proptest::prelude::*;

use arbor_kernel::{Point3d, Pose, Vec3};
use arbor_parts::*;

// ── Helper Functions ──────────────────────────────────────────────────────

fn settings() -> BuildSettings {
    BuildSettings::default()
}

fn stem_shape(bend: f64) -> PartShape {
    PartShape::Stem(StemParams {
        length_pre: 4.0,
        length_post: 3.0,
        bend_angle: bend,
        fillet_radius: 1.0,
        stem_radius: 0.4,
        connector_radius: 0.3,
        connector_length: 1.0,
        reflected: false,
    })
}

fn leaf_shape() -> PartShape {
    PartShape::Leaf(LeafParams {
        width: 4.0,
        height: 3.0,
        thickness: 0.5,
    })
}

fn any_aligned(a: &Part, b: &Part, tolerance: f64) -> bool {
    let pa = a.world_probes();
    let pb = b.world_probes();
    pa.iter()
        .any(|x| pb.iter().any(|y| probes_aligned(x, y, tolerance)))
}

// ── Slot layout ───────────────────────────────────────────────────────────

#[test]
fn test_slot_scenario_22_2_6() {
    let slots = slot_layout(22.0, 2.0, 6.0, false);
    let lengths: Vec<f64> = slots.iter().map(|s| s.length).collect();
    assert_eq!(lengths, vec![6.0, 6.0, 2.0]);
}

#[test]
fn test_slot_scenario_12_2_6_keeps_round_hole() {
    let slots = slot_layout(12.0, 2.0, 6.0, false);
    let lengths: Vec<f64> = slots.iter().map(|s| s.length).collect();
    assert_eq!(lengths, vec![6.0, 0.0]);
    // 2 + 6 + 2 + 0 + 2 = 12
    let total: f64 = lengths.iter().sum::<f64>() + 2.0 * (slots.len() - 1) as f64 + 4.0;
    assert_relative_eq!(total, 12.0);
}

proptest! {
    #[test]
    fn slot_layout_fills_bar_when_remainder_placed(
        length in 1.0f64..100.0,
        spacing in 0.1f64..5.0,
        slot in 0.5f64..20.0,
    ) {
        let slots = slot_layout(length, spacing, slot, false);
        for s in &slots {
            prop_assert!(s.length >= 0.0);
            prop_assert!(s.length <= slot + 1e-9);
        }
        if let Some(last) = slots.last() {
            if last.length < slot {
                let gaps = spacing * (slots.len() - 1) as f64;
                let total: f64 = slots.iter().map(|s| s.length).sum::<f64>() + gaps + 2.0 * spacing;
                prop_assert!((total - length).abs() < 1e-6, "total {} vs {}", total, length);
            }
            prop_assert!(last.end() <= length - spacing + 1e-6);
        } else {
            prop_assert!(length - 2.0 * spacing < 0.0);
        }
    }

    #[test]
    fn reflected_layout_is_a_mirror(
        length in 1.0f64..100.0,
        spacing in 0.1f64..5.0,
        slot in 0.5f64..20.0,
    ) {
        let plain = slot_layout(length, spacing, slot, false);
        let mirrored = slot_layout(length, spacing, slot, true);
        prop_assert_eq!(plain.len(), mirrored.len());
        for (a, b) in plain.iter().zip(&mirrored) {
            prop_assert!((a.start - (length - b.end())).abs() < 1e-9);
        }
    }
}

// ── Mating geometry ───────────────────────────────────────────────────────

#[test]
fn test_stems_mate_when_stub_is_seated() {
    let a = Part::build(stem_shape(0.0), Pose::default(), &settings());
    // The tube of `a` ends at 4 + 3 = 7, so its stub fills the socket of `b`.
    let b = Part::build(stem_shape(0.0), Pose::at(7.0, 0.0, 0.0), &settings());
    assert!(a.kind().can_mate(b.kind()));
    let male = a.world_probes()[1];
    let socket = b.world_probes()[0];
    assert!(probes_aligned(&male, &socket, settings().coincidence));
    let proxies_b = b.world_proxies();
    assert!(!a
        .world_proxies()
        .iter()
        .any(|pa| proxies_b.iter().any(|pb| pa.overlaps(pb))));

    // Backed off by the stub length, the stub no longer reaches the socket.
    let gap = Part::build(stem_shape(0.0), Pose::at(8.0, 0.0, 0.0), &settings());
    assert!(!probes_aligned(&male, &gap.world_probes()[0], settings().coincidence));
}

#[test]
fn test_leaves_mate_along_shared_edge() {
    let a = Part::build(leaf_shape(), Pose::default(), &settings());
    let b = Part::build(leaf_shape(), Pose::at(4.0, 0.0, 0.0), &settings());
    // Right edge of `a` against left edge of `b`.
    let right = a.world_probes()[1];
    let left = b.world_probes()[3];
    assert!(probes_aligned(&right, &left, settings().coincidence));
    // The inset proxies keep touching panels apart.
    assert!(!a.world_proxies()[0].overlaps(&b.world_proxies()[0]));
}

#[test]
fn test_branch_hole_slides_onto_stem() {
    let stem = Part::build(stem_shape(0.0), Pose::default(), &settings());
    let branch_shape = PartShape::Branch(BranchParams {
        length: 10.0,
        thickness: 1.0,
        outer_radius: 1.0,
        hole_radius: 0.45,
        hole_spacing: 2.0,
        slot_length: 3.0,
        reflected: false,
    });
    // Turn the bar so its hole axis (+Y) runs along the stem (+X), with the
    // left hole centred on the stem's second plate joint at x = 1.5.
    let mut pose = Pose::at(1.0, 0.0, 0.0);
    pose.rotate(Vec3::new(0.0, 0.0, -FRAC_PI_2));
    let branch = Part::build(branch_shape, pose, &settings());
    let hole = branch.world_probes()[0];
    let joint = stem.world_probes()[3];
    assert_relative_eq!(hole[0].x, 2.0, epsilon = 1e-9);
    assert!(probes_aligned(&hole, &joint, settings().coincidence));
    assert!(any_aligned(&stem, &branch, settings().coincidence));
}
