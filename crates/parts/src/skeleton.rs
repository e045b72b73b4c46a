use arbor_kernel::{Point3d, Transform};
use serde::{Deserialize, Serialize};

/// Structural nodes and the members joining them, in the part's local frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub nodes: Vec<Point3d>,
    /// Index pairs into `nodes`.
    pub members: Vec<(usize, usize)>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an open chain of nodes, each joined to the next.
    pub fn add_chain(&mut self, points: &[Point3d]) {
        let base = self.nodes.len();
        self.nodes.extend_from_slice(points);
        for i in 1..points.len() {
            self.members.push((base + i - 1, base + i));
        }
    }

    /// Append a closed loop.
    pub fn add_loop(&mut self, points: &[Point3d]) {
        let base = self.nodes.len();
        self.add_chain(points);
        if points.len() > 2 {
            self.members.push((base + points.len() - 1, base));
        }
    }

    pub fn transformed(&self, t: &Transform) -> Self {
        Self {
            nodes: self.nodes.iter().map(|p| t.transform_point(p)).collect(),
            members: self.members.clone(),
        }
    }
}
