use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use tokio::sync::broadcast;
use tracing::debug;

use norm_types::{EntityId, QueryKey};

use crate::event::{ChangeEvent, ChangeKind, EventFilter};

/// A broadcast channel receiver for change events.
pub type ChangeStream = broadcast::Receiver<ChangeEvent>;

/// Configuration for the [`Notifier`].
#[derive(Clone, Debug)]
pub struct NotifierConfig {
    /// Capacity of per-subscriber broadcast channels.
    pub channel_capacity: usize,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<ChangeEvent>,
}

/// Fan-out router that delivers cache change events to subscribed views.
///
/// Each subscriber registers an [`EventFilter`] and receives matching events
/// on its own broadcast channel. Events are stamped with a monotonic sequence
/// number at emission. The notifier is an explicit instance threaded through
/// the cache components at construction; there is no process-wide global.
pub struct Notifier {
    subscribers: RwLock<Vec<Subscriber>>,
    next_seq: AtomicU64,
    config: NotifierConfig,
}

impl Notifier {
    /// Create a notifier with the given configuration.
    pub fn new(config: NotifierConfig) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_seq: AtomicU64::new(1),
            config,
        }
    }

    /// Register a new subscriber with the given filter.
    /// Returns a broadcast receiver for the matching events.
    pub fn subscribe(&self, filter: EventFilter) -> ChangeStream {
        let (tx, rx) = broadcast::channel(self.config.channel_capacity);
        let sub = Subscriber { filter, sender: tx };
        self.subscribers
            .write()
            .expect("notifier lock poisoned")
            .push(sub);
        rx
    }

    /// Emit an entity-changed event.
    pub fn emit_entity(&self, id: &EntityId) -> ChangeEvent {
        self.emit(ChangeKind::Entity(id.clone()))
    }

    /// Emit a query-changed event.
    pub fn emit_query(&self, key: &QueryKey) -> ChangeEvent {
        self.emit(ChangeKind::Query(key.clone()))
    }

    /// Stamp and route one event to all matching subscribers.
    /// Subscribers whose channels are closed are pruned.
    pub fn emit(&self, kind: ChangeKind) -> ChangeEvent {
        let event = ChangeEvent {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            kind,
        };

        let mut subs = self.subscribers.write().expect("notifier lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(&event) {
                // If send fails (no receivers), the subscriber is stale.
                sub.sender.send(event.clone()).is_ok()
            } else {
                // Keep non-matching subscribers; they may match future events.
                // Only prune if the channel itself is closed.
                sub.sender.receiver_count() > 0
            }
        });

        debug!(seq = event.seq, kind = %event.kind, "change emitted");
        event
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .expect("notifier lock poisoned")
            .len()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NotifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(n: u32) -> EntityId {
        format!("Collection:{n}").parse().unwrap()
    }

    // ---- Test 1: Subscriber receives matching entity events ----
    #[tokio::test]
    async fn subscriber_receives_matching_events() {
        let notifier = Notifier::default();
        let mut stream = notifier.subscribe(EventFilter::entity(collection(1)));

        notifier.emit_entity(&collection(1));

        let event = stream.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Entity(collection(1)));
    }

    // ---- Test 2: Non-matching events are not delivered ----
    #[tokio::test]
    async fn non_matching_events_not_delivered() {
        let notifier = Notifier::default();
        let mut stream = notifier.subscribe(EventFilter::entity(collection(1)));

        notifier.emit_entity(&collection(2));
        notifier.emit_entity(&collection(1));

        // Only the Collection:1 event arrives.
        let event = stream.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Entity(collection(1)));
        assert!(stream.try_recv().is_err());
    }

    // ---- Test 3: Sequence numbers are strictly increasing ----
    #[tokio::test]
    async fn sequence_numbers_increase() {
        let notifier = Notifier::default();
        let mut stream = notifier.subscribe(EventFilter::all());

        notifier.emit_entity(&collection(1));
        notifier.emit_query(&QueryKey::new("q", &json!({})).unwrap());

        let first = stream.recv().await.unwrap();
        let second = stream.recv().await.unwrap();
        assert!(second.seq > first.seq);
    }

    // ---- Test 4: Dropped subscribers are pruned on emit ----
    #[tokio::test]
    async fn dropped_subscribers_pruned() {
        let notifier = Notifier::default();
        let stream = notifier.subscribe(EventFilter::all());
        assert_eq!(notifier.subscriber_count(), 1);

        drop(stream);
        notifier.emit_entity(&collection(1));
        assert_eq!(notifier.subscriber_count(), 0);
    }

    // ---- Test 5: Multiple subscribers each get their own copy ----
    #[tokio::test]
    async fn multiple_subscribers_fan_out() {
        let notifier = Notifier::default();
        let mut a = notifier.subscribe(EventFilter::all());
        let mut b = notifier.subscribe(EventFilter::entity(collection(1)));

        notifier.emit_entity(&collection(1));

        assert_eq!(
            a.recv().await.unwrap().kind,
            ChangeKind::Entity(collection(1))
        );
        assert_eq!(
            b.recv().await.unwrap().kind,
            ChangeKind::Entity(collection(1))
        );
    }
}
