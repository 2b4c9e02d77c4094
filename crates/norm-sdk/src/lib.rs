//! High-level SDK for the norm client cache.
//!
//! Provides a unified API for the UI glue embedding the cache: a
//! [`CacheSession`] wires the normalized store, the query-result cache, the
//! change notifier, and the mutation executor together around an injected
//! [`norm_mutate::RemoteService`]. Sessions are independent instances; a
//! process (or a test) can hold several.

pub mod error;
pub mod membership;
pub mod session;

pub use error::{SdkError, SdkResult};
pub use membership::MembershipToggle;
pub use session::{CacheSession, SessionConfig};

// Re-export key types
pub use norm_mutate::{
    CacheHandles, ListTarget, MutateError, MutateResult, PendingDirection, RemoteError,
    RemoteResult, RemoteService,
};
pub use norm_notify::{ChangeEvent, ChangeKind, ChangeStream, EventFilter};
pub use norm_query::{Edge, EdgeList, QueryCache, ResultTree, TreeValue};
pub use norm_store::{EntityStore, FragmentAccessor};
pub use norm_types::{EntityId, EntityRecord, FieldPatch, FieldValue, Fragment, FragmentData, QueryKey};
