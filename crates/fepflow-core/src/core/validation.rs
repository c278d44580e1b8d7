use thiserror::Error;

/// Errors raised when caller-supplied data violates a structural rule.
///
/// These are always fatal at startup: nothing is persisted when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("edge list is empty")]
    EmptyEdgeList,

    #[error("edge list entry {index} has {len} element(s), expected a pair of compound names")]
    NotAPair { index: usize, len: usize },

    #[error("edge list entry {index} connects compound '{name}' to itself")]
    SelfEdge { index: usize, name: String },

    #[error("compound name '{0}' is not unique")]
    DuplicateCompound(String),

    #[error("hub compound '{0}' not found")]
    MissingHub(String),

    #[error("cannot split edges into {0} part(s); at least two parts are required")]
    TooFewParts(usize),

    #[error("atom core maps {side} index {index} more than once")]
    DuplicateCoreIndex { side: &'static str, index: usize },

    #[error("atom core index {index} is out of range for compound '{compound}' ({num_atoms} atoms)")]
    CoreIndexOutOfRange {
        compound: String,
        index: usize,
        num_atoms: usize,
    },

    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid value '{value}' in column '{column}'")]
    InvalidColumnValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("compound '{compound}' has no property '{property}' to alias")]
    MissingProperty { compound: String, property: String },
}
