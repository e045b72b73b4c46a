//! World-space structural model gathered from part skeletons.

use arbor_kernel::Point3d;
use arbor_parts::PartId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructuralNode {
    pub part: PartId,
    pub position: Point3d,
}

/// Nodes and members of every part shown in structural view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralModel {
    pub nodes: Vec<StructuralNode>,
    /// Index pairs into `nodes`.
    pub members: Vec<(usize, usize)>,
}

impl StructuralModel {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes of one part.
    pub fn nodes_of(&self, part: PartId) -> impl Iterator<Item = &StructuralNode> + '_ {
        self.nodes.iter().filter(move |n| n.part == part)
    }
}
