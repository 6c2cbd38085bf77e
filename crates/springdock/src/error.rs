//! Error types for dock model operations.

use thiserror::Error;

/// Errors returned by [`DockModel`](crate::model::DockModel) mutations and
/// persistence.
///
/// The drag state machine itself never produces these: unresolvable drops
/// cancel silently and missing layout falls back.
#[derive(Debug, Error)]
pub enum DockError {
    /// No item with this id exists in the dock or any folder.
    #[error("item {0:?} not found")]
    ItemNotFound(String),
    /// The item exists but is not a folder.
    #[error("item {0:?} is not a folder")]
    NotAFolder(String),
    /// The operation would place a folder inside a folder.
    #[error("folder {0:?} cannot be nested inside another folder")]
    NestedFolder(String),
    /// An item cannot be merged with or dropped onto itself.
    #[error("item {0:?} cannot be merged with itself")]
    SelfMerge(String),
    /// Index outside the target list.
    #[error("index {index} out of range for list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// Persisted dock contents could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for dock model operations.
pub type DockResult<T> = Result<T, DockError>;
