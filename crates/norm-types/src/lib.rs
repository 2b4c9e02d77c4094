//! Foundation types for the norm client cache.
//!
//! This crate provides the identity, value, and key types used throughout the
//! norm system. Every other norm crate depends on `norm-types`.
//!
//! # Key Types
//!
//! - [`EntityId`] — Typed identity addressing one entity (`"<Type>:<externalId>"`)
//! - [`FieldValue`] — A field's value: scalar, reference, list, or null
//! - [`EntityRecord`] — Mapping from field name to [`FieldValue`]
//! - [`FieldPatch`] — Partial record applied via shallow merge
//! - [`Fragment`] — A named, declared subset of an entity's fields
//! - [`FragmentData`] — Immutable snapshot of fragment values
//! - [`QueryKey`] — Cache key for a query: operation name + canonical variables

pub mod error;
pub mod fragment;
pub mod id;
pub mod query;
pub mod record;
pub mod value;

pub use error::TypeError;
pub use fragment::{Fragment, FragmentData};
pub use id::EntityId;
pub use query::QueryKey;
pub use record::{EntityRecord, FieldPatch};
pub use value::{FieldValue, Scalar};
