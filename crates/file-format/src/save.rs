use arbor_assembly::Tree;
use tracing::{info, instrument};

use crate::record::PartRecord;

/// First line of every saved file. Readers skip it like any comment.
pub const FILE_HEADER: &str = "# arbor parts v1";

/// One line per live part, in insertion order, after [`FILE_HEADER`].
///
/// Only shape and pose are saved; ids, selection and display flags are not.
#[instrument(skip(tree), fields(parts = tree.len()))]
pub fn save_tree(tree: &Tree) -> String {
    let mut out = String::from(FILE_HEADER);
    out.push('\n');
    for (_, part) in tree.iter() {
        out.push_str(&PartRecord::new(*part.shape(), *part.pose()).to_line());
        out.push('\n');
    }
    info!(bytes = out.len(), "tree saved");
    out
}
