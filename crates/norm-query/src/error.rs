//! Error types for query-cache operations.

use thiserror::Error;

use norm_store::StoreError;
use norm_types::EntityId;

/// Errors that can occur during query-result cache operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A path used for edge reconciliation does not exist in the tree.
    #[error("path {path} not present in result tree")]
    PathMissing { path: String },

    /// The value at a reconciliation path is not an edge list.
    #[error("value at {path} is not an edge list")]
    NotAnEdgeList { path: String },

    /// An edge list carries the same identity more than once.
    ///
    /// Duplicates are surfaced, never silently repaired; a blind removal
    /// could delete the wrong element.
    #[error("duplicate edge for {id} in edge list")]
    DuplicateEdge { id: EntityId },

    /// An edge references an identity unknown to the normalized store.
    #[error("edge references {id}, unknown to the store")]
    DanglingEdge { id: EntityId },

    /// Internal lock poisoned by a panicking writer.
    #[error("query cache lock poisoned: {0}")]
    LockPoisoned(String),

    /// An underlying store operation failed during consistency checking.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience type alias for query-cache operations.
pub type QueryResult<T> = std::result::Result<T, QueryError>;
