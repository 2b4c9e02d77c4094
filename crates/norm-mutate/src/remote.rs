//! The consumed remote boundary.
//!
//! The cache core owns no transport: query/mutation syntax, schema
//! validation, retries, and the wire live behind this trait. An
//! implementation typically wraps an HTTP client; tests use stubs with
//! scripted responses.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by the remote data service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The service processed the operation and rejected it.
    #[error("remote rejected {operation}: {message}")]
    Rejected { operation: String, message: String },

    /// The call never completed (connection, timeout, protocol).
    #[error("remote transport failure: {0}")]
    Transport(String),
}

/// Convenience type alias for remote operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Remote data service consumed by the cache core.
///
/// Results are JSON values shaped by the operation's declared return shape;
/// the core treats them as opaque and hands them to reconciliation closures.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Execute a named mutation with the given variables.
    async fn mutate(&self, operation: &str, variables: Value) -> RemoteResult<Value>;

    /// Execute a named query with the given variables.
    ///
    /// Used by the surrounding data-fetching glue to populate the query
    /// cache; the reconciliation core itself never calls it.
    async fn query(&self, operation: &str, variables: Value) -> RemoteResult<Value>;
}
