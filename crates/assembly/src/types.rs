use arbor_parts::{PartError, PartId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("part not found: {id}")]
    PartNotFound { id: PartId },

    #[error("part error: {0}")]
    Part(#[from] PartError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("settings parse error: {0}")]
    Parse(String),

    #[error("arc resolution must be an even number of at least 2")]
    OddArcResolution,

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}
