//! Session wiring: one cache instance and everything that operates on it.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use norm_mutate::{CacheHandles, MutateResult, MutationExecutor, PendingDirection, RemoteService};
use norm_notify::{ChangeStream, EventFilter, Notifier, NotifierConfig};
use norm_query::{InMemoryQueryCache, QueryCache, QueryCacheConfig, ResultTree};
use norm_store::{EntityStore, FragmentAccessor, InMemoryStore};
use norm_types::{EntityId, Fragment, FragmentData, QueryKey};

use crate::error::SdkResult;

/// Configuration for a [`CacheSession`].
#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    /// Change-notification channel sizing.
    pub notifier: NotifierConfig,
    /// Query-result cache sizing and eviction.
    pub query_cache: QueryCacheConfig,
}

/// One client cache session: store, query cache, notifier, and executor,
/// wired together around an injected remote service.
///
/// Everything is constructor-injected; independent sessions never share
/// state. The session lives as long as the running client and is dropped
/// wholesale — individual entities are never evicted.
pub struct CacheSession {
    notifier: Arc<Notifier>,
    store: Arc<InMemoryStore>,
    queries: Arc<InMemoryQueryCache>,
    executor: MutationExecutor,
}

impl CacheSession {
    /// Build a session over the given remote service.
    pub fn new(remote: Arc<dyn RemoteService>, config: SessionConfig) -> Self {
        let notifier = Arc::new(Notifier::new(config.notifier));
        let store = Arc::new(InMemoryStore::with_notifier(notifier.clone()));
        let queries = Arc::new(InMemoryQueryCache::with_notifier(
            config.query_cache,
            notifier.clone(),
        ));
        let handles = CacheHandles::new(store.clone(), queries.clone());
        let executor = MutationExecutor::new(remote, handles);

        info!("cache session started");
        Self {
            notifier,
            store,
            queries,
            executor,
        }
    }

    /// The normalized store.
    pub fn store(&self) -> &dyn EntityStore {
        &*self.store
    }

    /// The query-result cache.
    pub fn queries(&self) -> &dyn QueryCache {
        &*self.queries
    }

    /// The change notifier.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The mutation executor.
    pub fn executor(&self) -> &MutationExecutor {
        &self.executor
    }

    /// A fragment accessor over the session store.
    pub fn fragments(&self) -> FragmentAccessor<'_> {
        FragmentAccessor::new(&*self.store)
    }

    /// Subscribe-and-read: the current fragment snapshot plus a stream of
    /// subsequent change events for the same identity.
    ///
    /// The subscription is registered before the read, so a write landing
    /// between the two shows up on the stream rather than being lost.
    pub fn use_fragment(
        &self,
        id: &EntityId,
        fragment: &Fragment,
    ) -> SdkResult<(FragmentData, ChangeStream)> {
        let stream = self.notifier.subscribe(EventFilter::entity(id.clone()));
        let data = self.fragments().read_fragment(id, fragment)?;
        Ok((data, stream))
    }

    /// Store a fetched query result, making it available for reconciliation.
    ///
    /// The surrounding data-fetching glue calls this after resolving a query
    /// against the remote service; the reconciliation core itself never
    /// fetches.
    pub fn prime_query(&self, key: &QueryKey, tree: ResultTree) -> SdkResult<()> {
        self.queries.write_query(key, tree)?;
        Ok(())
    }

    /// Fire a mutation and reconcile the cache with its result.
    pub async fn run_mutation<F>(
        &self,
        operation: &str,
        variables: Value,
        reconcile: F,
    ) -> SdkResult<Value>
    where
        F: FnOnce(&CacheHandles, &Value) -> MutateResult<()>,
    {
        Ok(self.executor.execute(operation, variables, reconcile).await?)
    }

    /// The pending toggle direction for `id`, if a mutation is in flight.
    ///
    /// UI glue uses this to disable the affordance while a toggle resolves.
    pub fn pending(&self, id: &EntityId) -> Option<PendingDirection> {
        self.executor.pending(id)
    }
}
