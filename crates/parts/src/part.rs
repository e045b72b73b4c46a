//! A placed part: shape parameters, pose, derived geometry and display state.

use arbor_kernel::{OrientedBox, Point3d, Pose, SolidBody, Transform, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::branch::{build_branch, BranchParams};
use crate::connection::ConnectionPoint;
use crate::leaf::{build_leaf, LeafParams};
use crate::proxy::BoundingProxy;
use crate::skeleton::Skeleton;
use crate::stem::{build_stem, StemParams};
use crate::trunk::{build_trunk, TrunkParams};
use crate::types::{BuildSettings, PartError, PartKind};

/// Shape parameters of one part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PartShape {
    Leaf(LeafParams),
    Stem(StemParams),
    Branch(BranchParams),
    Trunk(TrunkParams),
}

impl PartShape {
    pub fn kind(&self) -> PartKind {
        match self {
            PartShape::Leaf(_) => PartKind::Leaf,
            PartShape::Stem(_) => PartKind::Stem,
            PartShape::Branch(_) => PartKind::Branch,
            PartShape::Trunk(_) => PartKind::Trunk,
        }
    }

    pub fn is_reflected(&self) -> bool {
        match self {
            PartShape::Leaf(_) => false,
            PartShape::Stem(p) => p.reflected,
            PartShape::Branch(p) => p.reflected,
            PartShape::Trunk(p) => p.reflected,
        }
    }

    /// The same shape with its reflected flag toggled.
    pub fn reflected(&self) -> Result<PartShape, PartError> {
        match *self {
            PartShape::Leaf(_) => Err(PartError::ReflectUnsupported {
                kind: PartKind::Leaf,
            }),
            PartShape::Stem(p) => Ok(PartShape::Stem(StemParams {
                reflected: !p.reflected,
                ..p
            })),
            PartShape::Branch(p) => Ok(PartShape::Branch(BranchParams {
                reflected: !p.reflected,
                ..p
            })),
            PartShape::Trunk(p) => Ok(PartShape::Trunk(TrunkParams {
                reflected: !p.reflected,
                ..p
            })),
        }
    }

    pub fn build(&self, settings: &BuildSettings) -> PartGeometry {
        match self {
            PartShape::Leaf(p) => build_leaf(p, settings),
            PartShape::Stem(p) => build_stem(p, settings),
            PartShape::Branch(p) => build_branch(p, settings),
            PartShape::Trunk(p) => build_trunk(p, settings),
        }
    }
}

/// Everything a builder derives from shape parameters, in the local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PartGeometry {
    pub body: SolidBody,
    pub connections: Vec<ConnectionPoint>,
    pub proxies: Vec<BoundingProxy>,
    pub skeleton: Skeleton,
}

/// Host-facing display switches. Copied with the part, never saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFlags {
    pub visible: bool,
    pub transparent: bool,
    pub show_connections: bool,
    pub structural_view: bool,
}

impl Default for DisplayFlags {
    fn default() -> Self {
        Self {
            visible: true,
            transparent: false,
            show_connections: false,
            structural_view: false,
        }
    }
}

/// Interaction state, rewritten every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransientState {
    pub hovered: bool,
    pub selected: bool,
    pub intersecting: bool,
}

#[derive(Debug, Clone)]
pub struct Part {
    shape: PartShape,
    pose: Pose,
    geometry: PartGeometry,
    pub display: DisplayFlags,
    pub state: TransientState,
}

impl Part {
    #[instrument(skip(settings), fields(kind = %shape.kind()))]
    pub fn build(shape: PartShape, pose: Pose, settings: &BuildSettings) -> Self {
        let geometry = shape.build(settings);
        info!(
            connections = geometry.connections.len(),
            proxies = geometry.proxies.len(),
            "part built"
        );
        Self {
            shape,
            pose,
            geometry,
            display: DisplayFlags::default(),
            state: TransientState::default(),
        }
    }

    /// A fresh part with the same shape, pose and display flags.
    pub fn duplicate(&self, settings: &BuildSettings) -> Self {
        let mut copy = Self::build(self.shape, self.pose, settings);
        copy.display = self.display;
        copy
    }

    /// A fresh part with the reflected flag toggled, at the same pose.
    pub fn reflect(&self, settings: &BuildSettings) -> Result<Self, PartError> {
        let mut mirrored = Self::build(self.shape.reflected()?, self.pose, settings);
        mirrored.display = self.display;
        Ok(mirrored)
    }

    pub fn kind(&self) -> PartKind {
        self.shape.kind()
    }

    pub fn shape(&self) -> &PartShape {
        &self.shape
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn body(&self) -> &SolidBody {
        &self.geometry.body
    }

    pub fn connections(&self) -> &[ConnectionPoint] {
        &self.geometry.connections
    }

    pub fn connections_mut(&mut self) -> &mut [ConnectionPoint] {
        &mut self.geometry.connections
    }

    pub fn proxies(&self) -> &[BoundingProxy] {
        &self.geometry.proxies
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.geometry.skeleton
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.pose.translate(delta);
    }

    pub fn rotate(&mut self, delta: Vec3) {
        self.pose.rotate(delta);
    }

    pub fn world_transform(&self) -> Transform {
        self.pose.transform()
    }

    /// Full-solid bounds as an oriented box in world space.
    pub fn world_hull(&self) -> OrientedBox {
        self.geometry.body.hull().transformed(&self.world_transform())
    }

    pub fn world_proxies(&self) -> Vec<BoundingProxy> {
        let t = self.world_transform();
        self.geometry.proxies.iter().map(|p| p.transformed(&t)).collect()
    }

    /// Probe pairs of every connection point in world space, in order.
    pub fn world_probes(&self) -> Vec<[Point3d; 2]> {
        let t = self.world_transform();
        self.geometry
            .connections
            .iter()
            .map(|c| c.world_probes(&t))
            .collect()
    }

    pub fn clear_connections(&mut self) {
        for c in &mut self.geometry.connections {
            c.connected_to = None;
        }
    }

    pub fn connectors_in_use(&self) -> usize {
        self.geometry
            .connections
            .iter()
            .filter(|c| c.is_connected())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch() -> PartShape {
        PartShape::Branch(BranchParams {
            length: 10.0,
            thickness: 1.0,
            outer_radius: 1.0,
            hole_radius: 0.3,
            hole_spacing: 2.0,
            slot_length: 4.0,
            reflected: false,
        })
    }

    #[test]
    fn test_leaf_cannot_reflect() {
        let leaf = PartShape::Leaf(LeafParams {
            width: 1.0,
            height: 1.0,
            thickness: 0.1,
        });
        assert_eq!(
            leaf.reflected(),
            Err(PartError::ReflectUnsupported {
                kind: PartKind::Leaf
            })
        );
    }

    #[test]
    fn test_reflect_toggles_flag_and_keeps_pose() {
        let settings = BuildSettings::default();
        let mut part = Part::build(branch(), Pose::at(1.0, 2.0, 3.0), &settings);
        part.display.transparent = true;
        let mirrored = part.reflect(&settings).unwrap();
        assert!(mirrored.shape().is_reflected());
        assert_eq!(mirrored.pose(), part.pose());
        assert!(mirrored.display.transparent);
        assert!(!mirrored.reflect(&settings).unwrap().shape().is_reflected());
    }

    #[test]
    fn test_world_probes_follow_pose() {
        let settings = BuildSettings::default();
        let mut part = Part::build(branch(), Pose::default(), &settings);
        let before = part.world_probes();
        part.translate(Vec3::new(0.0, 0.0, 5.0));
        let after = part.world_probes();
        for (a, b) in before.iter().zip(&after) {
            assert!((b[0].z - a[0].z - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_duplicate_keeps_display_but_not_state() {
        let settings = BuildSettings::default();
        let mut part = Part::build(branch(), Pose::default(), &settings);
        part.display.structural_view = true;
        part.state.selected = true;
        let copy = part.duplicate(&settings);
        assert!(copy.display.structural_view);
        assert!(!copy.state.selected);
    }
}
