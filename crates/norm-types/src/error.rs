//! Error types for the foundation crate.

use thiserror::Error;

/// Errors raised while constructing or parsing foundation types.
#[derive(Debug, Error)]
pub enum TypeError {
    /// The identity string does not follow the `"<Type>:<externalId>"` form.
    #[error("invalid entity identity: {value}: {reason}")]
    InvalidIdentity { value: String, reason: String },

    /// A fragment was declared with no fields.
    #[error("fragment {name} declares no fields")]
    EmptyFragment { name: String },

    /// Query variables could not be serialized to a canonical key.
    #[error("unserializable query variables: {0}")]
    UnserializableVariables(String),
}
