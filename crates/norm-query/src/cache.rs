//! The query-result cache: trait, in-memory implementation, and eviction.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use norm_notify::Notifier;
use norm_types::QueryKey;

use crate::error::{QueryError, QueryResult};
use crate::tree::ResultTree;

/// Configuration for the query-result cache.
#[derive(Clone, Debug, Default)]
pub struct QueryCacheConfig {
    /// Maximum number of cached query keys. When set, the least recently
    /// used key is evicted on overflow. `None` keeps every result for the
    /// session lifetime.
    pub capacity: Option<usize>,
}

/// Storage backend for denormalized query results.
///
/// Implementations must be thread-safe (`Send + Sync`). Reads clone trees
/// out; writes replace wholesale and notify per query key (not per embedded
/// entity).
pub trait QueryCache: Send + Sync {
    /// Read the tree cached under `key`, cloned out of the cache.
    ///
    /// Returns `Ok(None)` if the query has never been stored (or has been
    /// evicted). No side effects beyond recency tracking.
    fn read_query(&self, key: &QueryKey) -> QueryResult<Option<ResultTree>>;

    /// Replace the tree stored under `key` wholesale.
    ///
    /// Validates the no-duplicate-edges invariant of the incoming tree and
    /// emits a query-changed notification for `key` on success.
    fn write_query(&self, key: &QueryKey, tree: ResultTree) -> QueryResult<()>;

    /// Drop the tree stored under `key`, if any. Returns whether it existed.
    fn remove_query(&self, key: &QueryKey) -> QueryResult<bool>;

    /// Number of cached query results.
    fn len(&self) -> QueryResult<usize>;

    /// Whether the cache holds no results.
    fn is_empty(&self) -> QueryResult<bool> {
        Ok(self.len()? == 0)
    }
}

struct CacheState {
    trees: HashMap<QueryKey, ResultTree>,
    /// Keys ordered least-recently-used first. Touched on read and write.
    recency: Vec<QueryKey>,
}

impl CacheState {
    fn touch(&mut self, key: &QueryKey) {
        self.recency.retain(|k| k != key);
        self.recency.push(key.clone());
    }
}

/// An in-memory implementation of [`QueryCache`].
///
/// Trees live in a `HashMap` behind a `RwLock`, with a recency list driving
/// optional LRU eviction. An optional [`Notifier`] injected at construction
/// receives a query-changed event after every successful write, removal, and
/// eviction.
pub struct InMemoryQueryCache {
    inner: RwLock<CacheState>,
    notifier: Option<Arc<Notifier>>,
    config: QueryCacheConfig,
}

impl InMemoryQueryCache {
    /// Create a new empty cache with no notifier attached.
    pub fn new(config: QueryCacheConfig) -> Self {
        Self {
            inner: RwLock::new(CacheState {
                trees: HashMap::new(),
                recency: Vec::new(),
            }),
            notifier: None,
            config,
        }
    }

    /// Create a new empty cache that emits change events into `notifier`.
    pub fn with_notifier(config: QueryCacheConfig, notifier: Arc<Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
            ..Self::new(config)
        }
    }

    fn notify(&self, key: &QueryKey) {
        if let Some(notifier) = &self.notifier {
            notifier.emit_query(key);
        }
    }
}

impl Default for InMemoryQueryCache {
    fn default() -> Self {
        Self::new(QueryCacheConfig::default())
    }
}

impl QueryCache for InMemoryQueryCache {
    fn read_query(&self, key: &QueryKey) -> QueryResult<Option<ResultTree>> {
        let mut state = self
            .inner
            .write()
            .map_err(|e| QueryError::LockPoisoned(e.to_string()))?;
        let tree = state.trees.get(key).cloned();
        if tree.is_some() {
            state.touch(key);
        }
        Ok(tree)
    }

    fn write_query(&self, key: &QueryKey, tree: ResultTree) -> QueryResult<()> {
        tree.validate_edges()?;

        let evicted;
        {
            let mut state = self
                .inner
                .write()
                .map_err(|e| QueryError::LockPoisoned(e.to_string()))?;
            state.trees.insert(key.clone(), tree);
            state.touch(key);

            evicted = match self.config.capacity {
                Some(capacity) if state.trees.len() > capacity => {
                    let oldest = state.recency.remove(0);
                    state.trees.remove(&oldest);
                    Some(oldest)
                }
                _ => None,
            };
        }

        self.notify(key);
        if let Some(oldest) = evicted {
            debug!(key = %oldest, "query result evicted");
            self.notify(&oldest);
        }
        debug!(key = %key, "query result stored");
        Ok(())
    }

    fn remove_query(&self, key: &QueryKey) -> QueryResult<bool> {
        let existed;
        {
            let mut state = self
                .inner
                .write()
                .map_err(|e| QueryError::LockPoisoned(e.to_string()))?;
            existed = state.trees.remove(key).is_some();
            state.recency.retain(|k| k != key);
        }
        if existed {
            self.notify(key);
        }
        Ok(existed)
    }

    fn len(&self) -> QueryResult<usize> {
        let state = self
            .inner
            .read()
            .map_err(|e| QueryError::LockPoisoned(e.to_string()))?;
        Ok(state.trees.len())
    }

}
