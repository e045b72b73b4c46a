/// Why one saved line could not be turned back into a part.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("empty record")]
    Empty,

    #[error("unknown part kind: {tag}")]
    UnknownKind { tag: String },

    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid flag for {field}: {value:?}")]
    InvalidFlag { field: &'static str, value: String },
}
