use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a part within one tree. Assigned on insertion, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartId(pub u64);

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The four part families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    Leaf,
    Stem,
    Branch,
    Trunk,
}

impl PartKind {
    /// Lowercase tag used in saved files and log output.
    pub fn tag(self) -> &'static str {
        match self {
            PartKind::Leaf => "leaf",
            PartKind::Stem => "stem",
            PartKind::Branch => "branch",
            PartKind::Trunk => "trunk",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "leaf" => Some(PartKind::Leaf),
            "stem" => Some(PartKind::Stem),
            "branch" => Some(PartKind::Branch),
            "trunk" => Some(PartKind::Trunk),
            _ => None,
        }
    }

    /// Whether connectors of these two kinds may ever mate.
    ///
    /// Leaves only join leaves. Stems join every non-leaf kind, including
    /// other stems. Branches and trunks never join each other directly.
    pub fn can_mate(self, other: PartKind) -> bool {
        match (self, other) {
            (PartKind::Leaf, PartKind::Leaf) => true,
            (PartKind::Leaf, _) | (_, PartKind::Leaf) => false,
            (PartKind::Stem, _) | (_, PartKind::Stem) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Back-reference from one connection point to its mate on another part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionRef {
    pub part: PartId,
    /// Index into that part's connection list.
    pub index: usize,
}

/// Constants shared by every builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Points per full circle when sampling arcs and pill ends.
    pub arc_points: usize,
    /// Typical plate thickness; stems get one joint per increment of it.
    pub plate_thickness: f64,
    /// Inset applied to every bounding proxy.
    pub clearance: f64,
    /// Distance of each probe from its connection point.
    pub monitor_spacing: f64,
    /// World distance under which two probes count as coincident.
    pub coincidence: f64,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            arc_points: 32,
            plate_thickness: 1.0,
            clearance: 0.05,
            monitor_spacing: 0.5,
            coincidence: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PartError {
    #[error("{kind} parts cannot be reflected")]
    ReflectUnsupported { kind: PartKind },
}
