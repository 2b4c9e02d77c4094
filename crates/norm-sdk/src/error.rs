//! Error types for the SDK surface.

use thiserror::Error;

use norm_mutate::MutateError;
use norm_query::QueryError;
use norm_store::StoreError;
use norm_types::TypeError;

/// Errors surfaced by the SDK facade.
#[derive(Debug, Error)]
pub enum SdkError {
    /// A foundation type failed to construct or parse.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// A normalized-store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A query-cache operation failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A mutation failed; optimistic writes have been rolled back.
    #[error(transparent)]
    Mutate(#[from] MutateError),
}

/// Convenience type alias for SDK operations.
pub type SdkResult<T> = std::result::Result<T, SdkError>;
