//! Normalized entity store for the norm client cache.
//!
//! The store is the single source of truth for entity state: one mapping from
//! [`norm_types::EntityId`] to its known fields. Query results held elsewhere
//! are denormalized copies; when the two disagree, the store wins.
//!
//! # Architecture
//!
//! - Records are created lazily, the first time any write mentions their
//!   identity. There is no eager schema and no eviction (records live for the
//!   session).
//! - All writes go through shallow [`merge`](traits::EntityStore::merge): a
//!   field carried in the patch overwrites (explicit null included), a field
//!   not carried is untouched. Merges are all-or-nothing.
//! - Reads hand out owned clones. Nothing a caller receives aliases store
//!   internals; persisting a local edit requires an explicit write-back.
//!
//! # Modules
//!
//! - [`error`] — Error types for store operations
//! - [`traits`] — The [`EntityStore`] trait defining the storage interface
//! - [`memory`] — In-memory [`InMemoryStore`]
//! - [`fragment`] — The [`FragmentAccessor`] for declared-subset reads/writes

pub mod error;
pub mod fragment;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fragment::FragmentAccessor;
pub use memory::InMemoryStore;
pub use traits::EntityStore;
