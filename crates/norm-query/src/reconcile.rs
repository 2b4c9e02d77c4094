//! Edge-list membership reconciliation.
//!
//! Membership of an entity in a cached list (e.g. "collections the user
//! follows") is represented twice: as a boolean flag on the entity record and
//! as the presence of an edge in a query result. These helpers perform the
//! edge-list half of a toggle against the query cache; the mutation layer
//! pairs them with the fragment write so the two representations never
//! diverge.
//!
//! Both operations read the cached tree, locate the edge list by linear scan,
//! apply the change, and re-store the tree wholesale. A query that has never
//! been fetched is a no-op: there is no list to reconcile until the
//! surrounding glue populates it.

use tracing::debug;

use norm_store::EntityStore;
use norm_types::{EntityId, QueryKey};

use crate::cache::QueryCache;
use crate::error::{QueryError, QueryResult};
use crate::tree::{Edge, EdgeList};

/// Insert `edge` at the front of the edge list at `path` inside the result
/// cached under `key`.
///
/// Most-recently-toggled-first ordering: a newly joined entity appears at
/// index 0. If the identity is already present the list is left untouched
/// (idempotent). Returns whether the cached tree changed.
pub fn insert_edge_front(
    cache: &dyn QueryCache,
    key: &QueryKey,
    path: &[&str],
    edge: Edge,
) -> QueryResult<bool> {
    let Some(mut tree) = cache.read_query(key)? else {
        debug!(key = %key, "no cached result; insert skipped");
        return Ok(false);
    };

    let changed = tree.edges_at_mut(path)?.insert_front(edge);
    if changed {
        cache.write_query(key, tree)?;
    }
    Ok(changed)
}

/// Remove the edge for `id` from the edge list at `path` inside the result
/// cached under `key`.
///
/// Removal happens only when the linear scan actually finds the identity;
/// an absent identity leaves the list untouched in content and length.
/// Returns whether the cached tree changed.
pub fn remove_edge(
    cache: &dyn QueryCache,
    key: &QueryKey,
    path: &[&str],
    id: &EntityId,
) -> QueryResult<bool> {
    let Some(mut tree) = cache.read_query(key)? else {
        debug!(key = %key, "no cached result; removal skipped");
        return Ok(false);
    };

    let changed = tree.edges_at_mut(path)?.remove(id);
    if changed {
        cache.write_query(key, tree)?;
    }
    Ok(changed)
}

/// Verify an edge list against the normalized store.
///
/// Fails with [`QueryError::DuplicateEdge`] if an identity appears more than
/// once and with [`QueryError::DanglingEdge`] if an edge references an
/// identity the store has never seen. Violations are surfaced, never
/// repaired in place.
pub fn check_consistency(list: &EdgeList, store: &dyn EntityStore) -> QueryResult<()> {
    list.validate()?;
    for edge in list.iter() {
        if !store.contains(&edge.node_id)? {
            return Err(QueryError::DanglingEdge {
                id: edge.node_id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{InMemoryQueryCache, QueryCacheConfig};
    use crate::tree::{ResultTree, TreeValue};
    use norm_store::InMemoryStore;
    use norm_types::{EntityRecord, FieldPatch};
    use serde_json::json;

    const PATH: &[&str] = &["me", "followingCollections"];

    fn key() -> QueryKey {
        QueryKey::new("getFollowedCollections", &json!({"limit": 15})).unwrap()
    }

    fn collection(n: u32) -> EntityId {
        format!("Collection:{n}").parse().unwrap()
    }

    fn edge(n: u32) -> Edge {
        Edge::new(collection(n), EntityRecord::new().with("followed", true))
    }

    fn seeded_cache(ns: &[u32]) -> InMemoryQueryCache {
        let edges = ns.iter().map(|n| edge(*n)).collect();
        let tree = ResultTree::new().with(
            "me",
            TreeValue::Object(ResultTree::new().with(
                "followingCollections",
                TreeValue::Edges(EdgeList::from_edges(edges).unwrap()),
            )),
        );
        let cache = InMemoryQueryCache::new(QueryCacheConfig::default());
        cache.write_query(&key(), tree).unwrap();
        cache
    }

    fn ids(cache: &InMemoryQueryCache) -> Vec<EntityId> {
        cache
            .read_query(&key())
            .unwrap()
            .unwrap()
            .edges_at(PATH)
            .unwrap()
            .ids()
    }

    // ---- Test 1: Insert puts the new edge at index 0 ----
    #[test]
    fn insert_at_front() {
        let cache = seeded_cache(&[1, 2]);
        assert!(insert_edge_front(&cache, &key(), PATH, edge(3)).unwrap());
        assert_eq!(ids(&cache), vec![collection(3), collection(1), collection(2)]);
    }

    // ---- Test 2: Double insert is idempotent ----
    #[test]
    fn double_insert_idempotent() {
        let cache = seeded_cache(&[1]);
        assert!(insert_edge_front(&cache, &key(), PATH, edge(2)).unwrap());
        assert!(!insert_edge_front(&cache, &key(), PATH, edge(2)).unwrap());
        assert_eq!(ids(&cache), vec![collection(2), collection(1)]);
    }

    // ---- Test 3: Removing an absent id never touches the list ----
    //
    // Regression: a removal that splices at a not-found index must not
    // delete the last element.
    #[test]
    fn remove_absent_is_noop() {
        let cache = seeded_cache(&[1, 2]);
        assert!(!remove_edge(&cache, &key(), PATH, &collection(9)).unwrap());
        assert_eq!(ids(&cache), vec![collection(1), collection(2)]);
    }

    // ---- Test 4: Toggle symmetry ----
    #[test]
    fn toggle_symmetry() {
        let cache = seeded_cache(&[1, 2]);

        insert_edge_front(&cache, &key(), PATH, edge(3)).unwrap();
        assert_eq!(ids(&cache), vec![collection(3), collection(1), collection(2)]);

        remove_edge(&cache, &key(), PATH, &collection(3)).unwrap();
        assert_eq!(ids(&cache), vec![collection(1), collection(2)]);
    }

    // ---- Test 5: Unfetched query is a no-op for both operations ----
    #[test]
    fn unfetched_query_noop() {
        let cache = InMemoryQueryCache::default();
        assert!(!insert_edge_front(&cache, &key(), PATH, edge(1)).unwrap());
        assert!(!remove_edge(&cache, &key(), PATH, &collection(1)).unwrap());
        assert!(cache.read_query(&key()).unwrap().is_none());
    }

    // ---- Test 6: Consistency check flags dangling references ----
    #[test]
    fn consistency_flags_dangling() {
        let store = InMemoryStore::new();
        store
            .merge(&collection(1), FieldPatch::new().with("followed", true))
            .unwrap();

        let known = EdgeList::from_edges(vec![edge(1)]).unwrap();
        assert!(check_consistency(&known, &store).is_ok());

        let dangling = EdgeList::from_edges(vec![edge(1), edge(2)]).unwrap();
        let err = check_consistency(&dangling, &store).unwrap_err();
        assert!(matches!(err, QueryError::DanglingEdge { ref id } if *id == collection(2)));
    }

    // ---- Test 7: Wrong path surfaces a typed error ----
    #[test]
    fn wrong_path_is_typed_error() {
        let cache = seeded_cache(&[1]);
        let err = insert_edge_front(&cache, &key(), &["me", "nope"], edge(2)).unwrap_err();
        assert!(matches!(err, QueryError::PathMissing { .. }));
    }
}
