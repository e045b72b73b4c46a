//! Assembly of placed parts: the owning [`Tree`], the per-frame intersection
//! and compatibility sweeps, and the display state handed to the host.

pub mod display;
pub mod engine;
pub mod settings;
pub mod structure;
pub mod tree;
pub mod types;

pub use display::{InteractionState, RenderDirective};
pub use engine::{compatibility_sweep, intersection_sweep, parts_intersect, SweepEntry};
pub use settings::TreeSettings;
pub use structure::{StructuralModel, StructuralNode};
pub use tree::{FrameReport, Tree};
pub use types::{SettingsError, TreeError};
