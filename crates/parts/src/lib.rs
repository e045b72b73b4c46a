//! Part catalog: parametric builders for leaves, stems, branches and trunks,
//! plus their connection points and bounding proxies.
//!
//! Every builder is a pure function of its shape parameters and the shared
//! [`BuildSettings`]. Geometry is produced in the part's local frame; a
//! [`Part`] carries the pose that places it in the world.

pub mod branch;
pub mod connection;
pub mod leaf;
pub mod part;
pub mod proxy;
pub mod skeleton;
pub mod stem;
pub mod trunk;
pub mod types;

pub use branch::{build_branch, slot_layout, BranchParams, Slot};
pub use connection::{probes_aligned, ConnectionKind, ConnectionPoint};
pub use leaf::{build_leaf, LeafParams};
pub use part::{DisplayFlags, Part, PartGeometry, PartShape, TransientState};
pub use proxy::{comb_proxies, BoundingProxy, HoleRow, ProxyRole};
pub use skeleton::Skeleton;
pub use stem::{build_stem, StemParams, StemPath};
pub use trunk::{build_trunk, TrunkParams};
pub use types::{BuildSettings, ConnectionRef, PartError, PartId, PartKind};
