//! The mutation executor and its per-identity in-flight guard.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, warn};

use norm_query::{Edge, QueryCache};
use norm_store::{EntityStore, FragmentAccessor};
use norm_types::{EntityId, EntityRecord, QueryKey};

use crate::error::{MutateError, MutateResult};
use crate::remote::RemoteService;

/// Direction of a pending membership toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingDirection {
    /// The entity is being added to a list.
    Joining,
    /// The entity is being removed from a list.
    Leaving,
}

impl std::fmt::Display for PendingDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Joining => write!(f, "joining"),
            Self::Leaving => write!(f, "leaving"),
        }
    }
}

/// The edge list a membership toggle reconciles: one path inside one cached
/// query result.
#[derive(Clone, Copy, Debug)]
pub struct ListTarget<'a> {
    /// Key of the cached query holding the list.
    pub key: &'a QueryKey,
    /// Path of the edge list inside the result tree.
    pub path: &'a [&'a str],
}

/// The injected store and query cache a reconciliation closure writes
/// through.
///
/// Handles are explicit instances threaded in at construction — there is no
/// process-wide cache, and tests wire up as many independent pairs as they
/// need.
#[derive(Clone)]
pub struct CacheHandles {
    store: Arc<dyn EntityStore>,
    queries: Arc<dyn QueryCache>,
}

impl CacheHandles {
    /// Pair a store with a query cache.
    pub fn new(store: Arc<dyn EntityStore>, queries: Arc<dyn QueryCache>) -> Self {
        Self { store, queries }
    }

    /// The normalized store.
    pub fn store(&self) -> &dyn EntityStore {
        &*self.store
    }

    /// The query-result cache.
    pub fn queries(&self) -> &dyn QueryCache {
        &*self.queries
    }

    /// A fragment accessor over the store.
    pub fn fragments(&self) -> FragmentAccessor<'_> {
        FragmentAccessor::new(&*self.store)
    }
}

/// Orchestrates remote mutations and cache reconciliation.
///
/// All cache writes triggered by a mutation flow through `execute` or
/// `execute_optimistic`; the executor owns the per-identity in-flight state
/// machine (Idle → Pending(direction) → Idle) and the capture/rollback
/// discipline around optimistic writes.
pub struct MutationExecutor {
    remote: Arc<dyn RemoteService>,
    handles: CacheHandles,
    in_flight: Mutex<HashMap<EntityId, PendingDirection>>,
}

/// Removes the in-flight marker when the mutation resolves, on success and
/// failure alike.
struct FlightGuard<'a> {
    slots: &'a Mutex<HashMap<EntityId, PendingDirection>>,
    id: EntityId,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.remove(&self.id);
        }
    }
}

impl MutationExecutor {
    /// Build an executor over the given remote service and cache handles.
    pub fn new(remote: Arc<dyn RemoteService>, handles: CacheHandles) -> Self {
        Self {
            remote,
            handles,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The cache handles this executor writes through.
    pub fn handles(&self) -> &CacheHandles {
        &self.handles
    }

    /// The pending direction for `id`, if a mutation is in flight.
    pub fn pending(&self, id: &EntityId) -> Option<PendingDirection> {
        self.in_flight
            .lock()
            .expect("in-flight lock poisoned")
            .get(id)
            .copied()
    }

    /// Execute a mutation and reconcile the cache with its result.
    ///
    /// The remote call is sent first; on success `reconcile` runs against the
    /// injected handles with the returned value. On remote failure nothing
    /// has touched the cache and the typed error carries the operation name.
    pub async fn execute<F>(
        &self,
        operation: &str,
        variables: Value,
        reconcile: F,
    ) -> MutateResult<Value>
    where
        F: FnOnce(&CacheHandles, &Value) -> MutateResult<()>,
    {
        debug!(operation, "mutation dispatched");
        let result = self
            .remote
            .mutate(operation, variables)
            .await
            .map_err(|source| MutateError::RemoteCallFailed {
                operation: operation.to_string(),
                source,
            })?;

        reconcile(&self.handles, &result)?;
        debug!(operation, "mutation reconciled");
        Ok(result)
    }

    /// Execute a mutation with an optimistic cache write and rollback.
    ///
    /// Flow:
    /// 1. Mark `entity` as pending in `direction`; a second mutation against
    ///    an identity already pending is rejected with
    ///    [`MutateError::AlreadyPending`].
    /// 2. Capture the entity's current record and its slot (if any) in the
    ///    edge list addressed by `list`.
    /// 3. Apply `optimistic` — the speculative write the UI sees immediately.
    /// 4. Send the remote call.
    /// 5. On success run `reconcile` with the result; on any failure restore
    ///    the captured record and edge slot so the flag and edge-list
    ///    representations stay in agreement, then surface the typed error.
    ///
    /// Rollback is scoped to `entity`: mutations for other identities may
    /// resolve while this one is in flight, and their confirmed outcomes
    /// survive this one's failure. The closures must confine their writes to
    /// `entity`'s record and the list at `list`. The pending marker clears
    /// when the call resolves, either way.
    pub async fn execute_optimistic<O, F>(
        &self,
        operation: &str,
        variables: Value,
        entity: &EntityId,
        list: ListTarget<'_>,
        direction: PendingDirection,
        optimistic: O,
        reconcile: F,
    ) -> MutateResult<Value>
    where
        O: FnOnce(&CacheHandles) -> MutateResult<()>,
        F: FnOnce(&CacheHandles, &Value) -> MutateResult<()>,
    {
        let _guard = self.mark_pending(entity, direction)?;

        // Capture only what this mutation may touch. The guard makes the
        // captured record authoritative for this identity until we resolve.
        let saved_record = self.handles.store().get(entity)?;
        let saved_slot = match self.handles.queries().read_query(list.key)? {
            Some(tree) => tree
                .edges_at(list.path)
                .ok()
                .and_then(|edges| edges.locate(entity).map(|(i, e)| (i, e.clone()))),
            None => None,
        };

        debug!(operation, entity = %entity, %direction, "optimistic apply");
        if let Err(err) = optimistic(&self.handles) {
            self.rollback(operation, entity, &list, &saved_record, &saved_slot)?;
            return Err(err);
        }

        match self.remote.mutate(operation, variables).await {
            Ok(result) => {
                if let Err(err) = reconcile(&self.handles, &result) {
                    self.rollback(operation, entity, &list, &saved_record, &saved_slot)?;
                    return Err(err);
                }
                debug!(operation, entity = %entity, "mutation confirmed");
                Ok(result)
            }
            Err(source) => {
                self.rollback(operation, entity, &list, &saved_record, &saved_slot)?;
                Err(MutateError::RemoteCallFailed {
                    operation: operation.to_string(),
                    source,
                })
            }
        }
    }

    fn mark_pending(
        &self,
        id: &EntityId,
        direction: PendingDirection,
    ) -> MutateResult<FlightGuard<'_>> {
        let mut slots = self.in_flight.lock().expect("in-flight lock poisoned");
        if let Some(pending) = slots.get(id) {
            return Err(MutateError::AlreadyPending {
                id: id.clone(),
                direction: *pending,
            });
        }
        slots.insert(id.clone(), direction);
        Ok(FlightGuard {
            slots: &self.in_flight,
            id: id.clone(),
        })
    }

    /// Put `entity` back to its pre-mutation state, touching nothing else.
    ///
    /// The record is replaced wholesale with the captured copy. In the target
    /// edge list only this entity's own edge is reconciled: re-inserted at
    /// its captured index if the mutation removed it, removed if the mutation
    /// inserted it. Writes that landed for other identities while this call
    /// was in flight stay exactly as the server confirmed them.
    fn rollback(
        &self,
        operation: &str,
        entity: &EntityId,
        list: &ListTarget<'_>,
        saved_record: &Option<EntityRecord>,
        saved_slot: &Option<(usize, Edge)>,
    ) -> MutateResult<()> {
        warn!(operation, entity = %entity, "rolling back optimistic mutation");
        self.handles.store().replace(entity, saved_record.clone())?;

        let Some(mut tree) = self.handles.queries().read_query(list.key)? else {
            return Ok(());
        };
        let Ok(edges) = tree.edges_at_mut(list.path) else {
            return Ok(());
        };
        let changed = match (saved_slot, edges.position(entity)) {
            (Some((index, edge)), None) => edges.insert_at(*index, edge.clone()),
            (None, Some(_)) => edges.remove(entity),
            _ => false,
        };
        if changed {
            self.handles.queries().write_query(list.key, tree)?;
        }
        Ok(())
    }
}
