//! In-memory normalized store.
//!
//! [`InMemoryStore`] keeps all entity records in a `HashMap` protected by a
//! `RwLock`. It implements the full [`EntityStore`] trait and is the store
//! used for the lifetime of a client session; there is no persistence.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use norm_notify::Notifier;
use norm_types::{EntityId, EntityRecord, FieldPatch};

use crate::error::{StoreError, StoreResult};
use crate::traits::EntityStore;

/// An in-memory implementation of [`EntityStore`].
///
/// All records live in a `HashMap` behind a `RwLock`. An optional
/// [`Notifier`] injected at construction receives an entity-changed event
/// after every successful merge. The store is an explicit instance, not a
/// process-wide singleton; tests build as many as they need.
pub struct InMemoryStore {
    entities: RwLock<HashMap<EntityId, EntityRecord>>,
    notifier: Option<Arc<Notifier>>,
}

impl InMemoryStore {
    /// Create a new empty store with no notifier attached.
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            notifier: None,
        }
    }

    /// Create a new empty store that emits change events into `notifier`.
    pub fn with_notifier(notifier: Arc<Notifier>) -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
            notifier: Some(notifier),
        }
    }

    fn notify(&self, id: &EntityId) {
        if let Some(notifier) = &self.notifier {
            notifier.emit_entity(id);
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for InMemoryStore {
    fn get(&self, id: &EntityId) -> StoreResult<Option<EntityRecord>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(entities.get(id).cloned())
    }

    fn merge(&self, id: &EntityId, patch: FieldPatch) -> StoreResult<()> {
        {
            let mut entities = self
                .entities
                .write()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            entities.entry(id.clone()).or_default().merge(patch);
        }
        // Notify outside the lock; subscribers may re-read immediately.
        self.notify(id);
        debug!(id = %id, "record merged");
        Ok(())
    }

    fn len(&self) -> StoreResult<usize> {
        let entities = self
            .entities
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(entities.len())
    }

    fn replace(&self, id: &EntityId, record: Option<EntityRecord>) -> StoreResult<()> {
        let changed;
        {
            let mut entities = self
                .entities
                .write()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            changed = entities.get(id) != record.as_ref();
            match record {
                Some(record) => {
                    entities.insert(id.clone(), record);
                }
                None => {
                    entities.remove(id);
                }
            }
        }
        if changed {
            self.notify(id);
            debug!(id = %id, "record replaced");
        }
        Ok(())
    }
}
