//! Mutation execution for the norm client cache.
//!
//! The executor is the only component allowed to change the cache in response
//! to remote mutations. It sends the mutation through the [`RemoteService`]
//! boundary, and runs a caller-supplied reconciliation closure against the
//! injected store and query cache when the response arrives. Optimistic
//! execution applies a speculative closure *before* the remote call, backed
//! by a per-identity capture of the toggled record and its edge slot that is
//! restored if the call fails — a failed mutation never leaves the boolean
//! membership flag and the edge-list membership disagreeing, and never
//! disturbs the confirmed outcome of a concurrent mutation for another
//! identity.
//!
//! # Modules
//!
//! - [`error`] — Error types for mutation execution
//! - [`remote`] — The consumed [`RemoteService`] boundary
//! - [`executor`] — [`MutationExecutor`] and the per-identity in-flight guard

pub mod error;
pub mod executor;
pub mod remote;

pub use error::{MutateError, MutateResult};
pub use executor::{CacheHandles, ListTarget, MutationExecutor, PendingDirection};
pub use remote::{RemoteError, RemoteResult, RemoteService};
