//! The [`EntityStore`] trait defining the normalized storage interface.

use norm_types::{EntityId, EntityRecord, FieldPatch};

use crate::error::StoreResult;

/// Storage backend for normalized entity records.
///
/// Implementations must be thread-safe (`Send + Sync`). All operations are
/// synchronous and atomic with respect to each other; only remote calls in
/// the layers above suspend.
pub trait EntityStore: Send + Sync {
    /// Read the record at `id`, cloned out of the store.
    ///
    /// Returns `Ok(None)` if nothing has ever written this identity. No side
    /// effects.
    fn get(&self, id: &EntityId) -> StoreResult<Option<EntityRecord>>;

    /// Shallow-merge `patch` into the record at `id`, creating the record if
    /// absent.
    ///
    /// A field carried in the patch overwrites the existing value (explicit
    /// null included); a field not carried is untouched. The merge is
    /// all-or-nothing and emits an entity-changed notification on success.
    fn merge(&self, id: &EntityId, patch: FieldPatch) -> StoreResult<()>;

    /// Whether the store has a record for `id`.
    fn contains(&self, id: &EntityId) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Number of known entities.
    fn len(&self) -> StoreResult<usize>;

    /// Whether the store holds no entities.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Replace the record at `id` wholesale, deleting it when `record` is
    /// `None`.
    ///
    /// Unlike [`merge`](EntityStore::merge) this does not combine with the
    /// existing record. Mutation rollback uses it to put one identity back to
    /// its pre-mutation state without touching any other record; the caller
    /// must hold whatever exclusivity makes that safe (the per-identity
    /// in-flight guard, in the mutation layer). Emits an entity-changed
    /// notification when the stored record actually changed.
    fn replace(&self, id: &EntityId, record: Option<EntityRecord>) -> StoreResult<()>;
}
