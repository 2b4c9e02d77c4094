//! Denormalized query-result cache for the norm client cache.
//!
//! Query results are stored as full denormalized trees keyed by
//! [`norm_types::QueryKey`], trading memory for read simplicity. The trees
//! embed entity identities (and denormalized record copies) rather than being
//! derived from the normalized store on demand, so consistency between the
//! two is maintained by disciplined co-writes from the mutation layer — this
//! crate supplies the reconciliation primitives that make that discipline
//! mechanical instead of manual.
//!
//! # Modules
//!
//! - [`error`] — Error types for query-cache operations
//! - [`tree`] — [`ResultTree`], [`TreeValue`], [`Edge`], [`EdgeList`]
//! - [`cache`] — The [`QueryCache`] trait and [`InMemoryQueryCache`]
//! - [`reconcile`] — Edge-list membership reconciliation

pub mod cache;
pub mod error;
pub mod reconcile;
pub mod tree;

pub use cache::{InMemoryQueryCache, QueryCache, QueryCacheConfig};
pub use error::{QueryError, QueryResult};
pub use reconcile::{check_consistency, insert_edge_front, remove_edge};
pub use tree::{Edge, EdgeList, ResultTree, TreeValue};
