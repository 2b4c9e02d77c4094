//! Error types for store operations.

use thiserror::Error;

use norm_types::EntityId;

/// Errors that can occur during normalized-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity identity is unknown to the store.
    ///
    /// A fragment read against an identity nothing has ever written is a
    /// caller logic error; it is surfaced as a typed failure, never as a
    /// silently empty result.
    #[error("fragment target not in store: {id}")]
    FragmentMissing { id: EntityId },

    /// The entity exists but a declared field has never been set on it.
    #[error("field {field} has never been set on {id}")]
    FieldMissing { id: EntityId, field: String },

    /// A fragment write carried a field outside the fragment's declaration.
    #[error("field {field} is not declared by fragment {fragment}")]
    FieldNotDeclared { fragment: String, field: String },

    /// A fragment write did not cover a declared field.
    #[error("fragment {fragment} write does not cover declared field {field}")]
    FieldNotCovered { fragment: String, field: String },

    /// Internal lock poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Convenience type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
