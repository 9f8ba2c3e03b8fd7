//! Error type shared by every pipeline stage.
//!
//! Construction errors are terminal for a load attempt: the chart is either
//! built completely or not at all.

/// Errors raised while loading, building or interacting with an org chart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    /// A row is malformed or misses a required field.
    #[error("row {row}: {message}")]
    DataFormat { row: usize, message: String },

    /// Two rows share the same `PositionID`.
    #[error("duplicate position id `{position_id}` (rows {first_row} and {second_row})")]
    DuplicatePosition {
        position_id: String,
        first_row: usize,
        second_row: usize,
    },

    /// More than one row has no parent.
    #[error("multiple root positions: {}", position_ids.join(", "))]
    MultipleRoots { position_ids: Vec<String> },

    /// No row is parentless (this includes an empty input).
    #[error("no root position found")]
    NoRoot,

    /// A `ParentPositionID` names a position that does not exist.
    #[error("position `{position_id}` references unknown parent `{parent_id}`")]
    DanglingParent {
        position_id: String,
        parent_id: String,
    },

    /// Parent links loop back on themselves.
    #[error("parent references form a cycle through position `{position_id}`")]
    Cycle { position_id: String },

    /// An interaction referenced a node that is not part of the chart.
    #[error("unknown node `{0}`")]
    UnknownNode(String),

    /// The supplied configuration could not be decoded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
