use arbor_assembly::Tree;
use arbor_parts::PartId;
use tracing::{info, instrument, warn};

use crate::errors::RecordError;
use crate::record::PartRecord;

/// A line that could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    /// 1-based.
    pub line: usize,
    pub error: RecordError,
}

/// Outcome of [`load_tree`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Ids of the added parts, in file order.
    pub loaded: Vec<PartId>,
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Add every part in `text` to `tree` under fresh ids.
///
/// Blank lines and `#` comments are ignored. A bad line is reported and
/// skipped; the rest of the file still loads.
#[instrument(skip(text, tree))]
pub fn load_tree(text: &str, tree: &mut Tree) -> LoadReport {
    let mut report = LoadReport::default();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match PartRecord::parse(line) {
            Ok(record) => report.loaded.push(tree.add(record.shape, record.pose)),
            Err(error) => {
                warn!(line = index + 1, %error, "skipping saved part");
                report.skipped.push(SkippedLine {
                    line: index + 1,
                    error,
                });
            }
        }
    }
    info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        "tree loaded"
    );
    report
}
