use serde::{Deserialize, Serialize};

use norm_types::{EntityId, QueryKey};

/// What changed: one entity record, or one cached query result.
///
/// Entity events fire on fragment writes and store merges; query events fire
/// on wholesale query-result replacement. A query write deliberately does
/// *not* fan out per embedded entity — views watching a list re-read the
/// whole tree anyway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The record at this identity was merged into.
    Entity(EntityId),
    /// The result tree stored under this key was replaced or evicted.
    Query(QueryKey),
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entity(id) => write!(f, "entity {id}"),
            Self::Query(key) => write!(f, "query {key}"),
        }
    }
}

/// A single change notification.
///
/// The `seq` is stamped by the emitting [`crate::Notifier`] and is strictly
/// monotonic per notifier instance, so subscribers can detect missed events
/// after a lagging broadcast channel drops some.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Monotonic sequence number, per notifier instance.
    pub seq: u64,
    /// What changed.
    pub kind: ChangeKind,
}

/// Filter for subscribing to a subset of change events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events for these entity identities are delivered.
    pub entities: Option<Vec<EntityId>>,
    /// If set, only events for these query keys are delivered.
    pub queries: Option<Vec<QueryKey>>,
}

impl EventFilter {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match only changes to the given entity.
    pub fn entity(id: EntityId) -> Self {
        Self {
            entities: Some(vec![id]),
            queries: None,
        }
    }

    /// Match only changes to the given query key.
    pub fn query(key: QueryKey) -> Self {
        Self {
            entities: None,
            queries: Some(vec![key]),
        }
    }

    /// Returns `true` if the given event matches this filter.
    ///
    /// An unset dimension matches everything in that dimension; a set
    /// dimension only matches events of its own kind listed in it. When both
    /// dimensions are set, an event matching either is delivered.
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match (&self.entities, &self.queries) {
            (None, None) => true,
            (Some(ids), None) => match &event.kind {
                ChangeKind::Entity(id) => ids.contains(id),
                ChangeKind::Query(_) => false,
            },
            (None, Some(keys)) => match &event.kind {
                ChangeKind::Query(key) => keys.contains(key),
                ChangeKind::Entity(_) => false,
            },
            (Some(ids), Some(keys)) => match &event.kind {
                ChangeKind::Entity(id) => ids.contains(id),
                ChangeKind::Query(key) => keys.contains(key),
            },
        }
    }
}
