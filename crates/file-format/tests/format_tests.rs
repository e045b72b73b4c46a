use std::f64::consts::PI;

use proptest::prelude::*;

use arbor_assembly::Tree;
use arbor_file_format::{load_tree, save_tree, RecordError, FILE_HEADER};
use arbor_kernel::{Point3d, Pose, Vec3};
use arbor_parts::{BranchParams, LeafParams, PartShape, StemParams, TrunkParams};

// ── Helper Functions ─────────────────────────────────────────────────────

fn sample_shapes() -> Vec<PartShape> {
    vec![
        PartShape::Leaf(LeafParams {
            width: 4.0,
            height: 3.0,
            thickness: 0.5,
        }),
        PartShape::Stem(StemParams {
            length_pre: 4.0,
            length_post: 3.0,
            bend_angle: PI / 3.0,
            fillet_radius: 1.0,
            stem_radius: 0.4,
            connector_radius: 0.3,
            connector_length: 1.0,
            reflected: true,
        }),
        PartShape::Branch(BranchParams {
            length: 22.0,
            thickness: 1.0,
            outer_radius: 1.0,
            hole_radius: 0.45,
            hole_spacing: 2.0,
            slot_length: 6.0,
            reflected: false,
        }),
        PartShape::Trunk(TrunkParams {
            length: 10.0,
            width: 8.0,
            thickness: 1.0,
            rib_count: 3,
            rib_radius: 1.0,
            rib_thickness: 0.5,
            rib_spacing: 2.0,
            edge_distance: 1.0,
            hole_radius: 0.3,
            hole_spacing: 2.0,
            reflected: true,
        }),
    ]
}

fn sample_tree() -> Tree {
    let mut tree = Tree::default();
    for (i, shape) in sample_shapes().into_iter().enumerate() {
        let id = tree.add(shape, Pose::at(i as f64 * 1.5, 0.1, -0.3));
        tree.rotate(id, Vec3::new(0.25, -PI / 7.0, 0.0)).unwrap();
    }
    tree
}

fn records(tree: &Tree) -> Vec<(PartShape, Pose)> {
    tree.iter().map(|(_, p)| (*p.shape(), *p.pose())).collect()
}

// ── Round trip ───────────────────────────────────────────────────────────

#[test]
fn test_round_trip_preserves_kind_pose_and_params() {
    let tree = sample_tree();
    let text = save_tree(&tree);
    assert!(text.starts_with(FILE_HEADER));
    assert_eq!(text.lines().count(), 5);

    let mut reloaded = Tree::default();
    let report = load_tree(&text, &mut reloaded);
    assert!(report.is_clean());
    assert_eq!(report.loaded.len(), 4);
    assert_eq!(records(&reloaded), records(&tree));
}

#[test]
fn test_reload_into_same_tree_gets_fresh_ids() {
    let mut tree = sample_tree();
    let original: Vec<_> = tree.iter().map(|(id, _)| id).collect();
    let text = save_tree(&tree);
    let report = load_tree(&text, &mut tree);
    assert_eq!(tree.len(), 8);
    let max_original = original.iter().max().copied().unwrap();
    assert!(report.loaded.iter().all(|id| *id > max_original));
}

#[test]
fn test_bad_lines_are_reported_not_fatal() {
    let text = "\
# saved by hand
leaf,0,0,0,0,0,0,4,3,0.5

bush,0,0,0,0,0,0,1
leaf,0,0,0,0,0,0,4
branch,1,2,3,0,0,0,22,1,1,0.45,2,6
";
    let mut tree = Tree::default();
    let report = load_tree(text, &mut tree);
    assert_eq!(report.loaded.len(), 2);
    assert_eq!(tree.len(), 2);
    let lines: Vec<usize> = report.skipped.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![4, 5]);
    assert_eq!(
        report.skipped[0].error,
        RecordError::UnknownKind { tag: "bush".into() }
    );
    assert_eq!(
        report.skipped[1].error,
        RecordError::MissingField { field: "height" }
    );
}

#[test]
fn test_runaway_trunk_line_is_skipped() {
    let text = "\
trunk,0,0,0,0,0,0,10,8,1,1000000000000,1,0.5,2,1,0.3,2,0
leaf,0,0,0,0,0,0,4,3,0.5
";
    let mut tree = Tree::default();
    let report = load_tree(text, &mut tree);
    assert_eq!(tree.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 1);
    assert!(matches!(
        report.skipped[0].error,
        RecordError::InvalidNumber { field: "rib_count", .. }
    ));
}

proptest! {
    #[test]
    fn pose_survives_round_trip(
        (x, y, z) in (-1e4f64..1e4, -1e4f64..1e4, -1e4f64..1e4),
        (rx, ry, rz) in (-10.0f64..10.0, -10.0f64..10.0, -10.0f64..10.0),
        width in 0.01f64..100.0,
    ) {
        let mut tree = Tree::default();
        let shape = PartShape::Leaf(LeafParams { width, height: 1.0, thickness: 0.2 });
        let pose = Pose::new(Point3d::new(x, y, z), Vec3::new(rx, ry, rz));
        tree.add(shape, pose);

        let mut reloaded = Tree::default();
        load_tree(&save_tree(&tree), &mut reloaded);
        prop_assert_eq!(records(&reloaded), vec![(shape, pose)]);
    }
}
