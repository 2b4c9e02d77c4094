use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use norm_types::{EntityId, EntityRecord, Scalar};

use crate::error::{QueryError, QueryResult};

/// One entry in an ordered edge list: an entity identity plus a denormalized
/// copy of the node's fields as the query returned them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Identity of the referenced entity.
    pub node_id: EntityId,
    /// Denormalized field copy, redundant with the normalized store.
    pub node: EntityRecord,
}

impl Edge {
    /// Build an edge from an identity and its denormalized record.
    pub fn new(node_id: EntityId, node: EntityRecord) -> Self {
        Self { node_id, node }
    }
}

/// An ordered list of edges inside a result tree.
///
/// Invariant: no two edges share a `node_id`. The list is ordered
/// most-recently-toggled-first; membership toggles insert at the front.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    /// Create an empty edge list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from edges, validating the no-duplicates invariant.
    pub fn from_edges(edges: Vec<Edge>) -> QueryResult<Self> {
        let list = Self { edges };
        list.validate()?;
        Ok(list)
    }

    /// Index of the edge whose node identity equals `id`, by linear scan.
    pub fn position(&self, id: &EntityId) -> Option<usize> {
        self.edges.iter().position(|e| &e.node_id == id)
    }

    /// Whether the list contains an edge for `id`.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.position(id).is_some()
    }

    /// Insert an edge at the front unless its identity is already present.
    ///
    /// Returns `true` if the list changed. Double insertion is idempotent.
    pub fn insert_front(&mut self, edge: Edge) -> bool {
        self.insert_at(0, edge)
    }

    /// Insert an edge at `index` (clamped to the current length) unless its
    /// identity is already present.
    ///
    /// Returns `true` if the list changed. Used by rollback to put an edge
    /// back where it was without disturbing its neighbors.
    pub fn insert_at(&mut self, index: usize, edge: Edge) -> bool {
        if self.contains(&edge.node_id) {
            return false;
        }
        let index = index.min(self.edges.len());
        self.edges.insert(index, edge);
        true
    }

    /// The edge for `id` together with its index, if present.
    pub fn locate(&self, id: &EntityId) -> Option<(usize, &Edge)> {
        self.position(id).map(|i| (i, &self.edges[i]))
    }

    /// Remove the edge for `id` if — and only if — it is present.
    ///
    /// Returns `true` if the list changed. Removing an absent identity is a
    /// strict no-op; no other element is ever touched.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.edges.remove(index);
                true
            }
            None => false,
        }
    }

    /// Verify the no-duplicates invariant.
    pub fn validate(&self) -> QueryResult<()> {
        for (i, edge) in self.edges.iter().enumerate() {
            if self.edges[..i].iter().any(|e| e.node_id == edge.node_id) {
                return Err(QueryError::DuplicateEdge {
                    id: edge.node_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Iterate over edges in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Identities in list order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.edges.iter().map(|e| e.node_id.clone()).collect()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// One value inside a denormalized result tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeValue {
    /// Explicit null.
    Null,
    /// A scalar leaf.
    Scalar(Scalar),
    /// A bare reference to an entity by identity.
    Ref(EntityId),
    /// A nested object.
    Object(ResultTree),
    /// An ordered edge list.
    Edges(EdgeList),
}

/// A denormalized query-result tree.
///
/// The shape mirrors what the remote service returned: nested objects down to
/// edge lists that embed entity identities. Paths like
/// `["me", "user", "followingCollections"]` address nested values for
/// reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTree {
    fields: BTreeMap<String, TreeValue>,
}

impl ResultTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one field, returning `self` for chaining in construction code.
    pub fn with(mut self, field: &str, value: TreeValue) -> Self {
        self.fields.insert(field.to_string(), value);
        self
    }

    /// Read one immediate field.
    pub fn get(&self, field: &str) -> Option<&TreeValue> {
        self.fields.get(field)
    }

    /// Read the value at a nested path, descending through objects.
    pub fn get_path(&self, path: &[&str]) -> Option<&TreeValue> {
        let (first, rest) = path.split_first()?;
        let value = self.fields.get(*first)?;
        if rest.is_empty() {
            return Some(value);
        }
        match value {
            TreeValue::Object(inner) => inner.get_path(rest),
            _ => None,
        }
    }

    /// Borrow the edge list at a nested path.
    pub fn edges_at(&self, path: &[&str]) -> QueryResult<&EdgeList> {
        match self.get_path(path) {
            Some(TreeValue::Edges(list)) => Ok(list),
            Some(_) => Err(QueryError::NotAnEdgeList {
                path: path.join("."),
            }),
            None => Err(QueryError::PathMissing {
                path: path.join("."),
            }),
        }
    }

    /// Mutably borrow the edge list at a nested path.
    pub fn edges_at_mut(&mut self, path: &[&str]) -> QueryResult<&mut EdgeList> {
        let joined = path.join(".");
        let mut current = self;
        let (last, rest) = path.split_last().ok_or_else(|| QueryError::PathMissing {
            path: joined.clone(),
        })?;

        for segment in rest {
            current = match current.fields.get_mut(*segment) {
                Some(TreeValue::Object(inner)) => inner,
                Some(_) => {
                    return Err(QueryError::NotAnEdgeList {
                        path: joined.clone(),
                    })
                }
                None => {
                    return Err(QueryError::PathMissing {
                        path: joined.clone(),
                    })
                }
            };
        }
        match current.fields.get_mut(*last) {
            Some(TreeValue::Edges(list)) => Ok(list),
            Some(_) => Err(QueryError::NotAnEdgeList { path: joined }),
            None => Err(QueryError::PathMissing { path: joined }),
        }
    }

    /// Validate the no-duplicates invariant of every edge list in the tree.
    pub fn validate_edges(&self) -> QueryResult<()> {
        for value in self.fields.values() {
            match value {
                TreeValue::Edges(list) => list.validate()?,
                TreeValue::Object(inner) => inner.validate_edges()?,
                _ => {}
            }
        }
        Ok(())
    }
}
