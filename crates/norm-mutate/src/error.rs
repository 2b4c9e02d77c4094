//! Error types for mutation execution.

use thiserror::Error;

use norm_query::QueryError;
use norm_store::StoreError;
use norm_types::EntityId;

use crate::executor::PendingDirection;
use crate::remote::RemoteError;

/// Errors that can occur while executing a mutation.
#[derive(Debug, Error)]
pub enum MutateError {
    /// The remote data service failed; any optimistic write has been rolled
    /// back before this error surfaced.
    #[error("mutation {operation} failed: {source}")]
    RemoteCallFailed {
        operation: String,
        #[source]
        source: RemoteError,
    },

    /// A mutation for this identity is already in flight.
    ///
    /// Re-entrant toggles are rejected, not queued; the caller retries after
    /// the pending mutation resolves.
    #[error("mutation already pending for {id} ({direction})")]
    AlreadyPending {
        id: EntityId,
        direction: PendingDirection,
    },

    /// A store operation inside an optimistic or reconciliation closure
    /// failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A query-cache operation inside an optimistic or reconciliation
    /// closure failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Convenience type alias for mutation execution.
pub type MutateResult<T> = std::result::Result<T, MutateError>;
