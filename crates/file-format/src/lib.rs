//! Line-per-part text persistence for part trees.

pub mod errors;
pub mod load;
pub mod record;
pub mod save;

pub use errors::RecordError;
pub use load::{load_tree, LoadReport, SkippedLine};
pub use record::{PartRecord, MAX_HOLES_PER_ROW, MAX_RIB_COUNT};
pub use save::{save_tree, FILE_HEADER};
