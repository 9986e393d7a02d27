use dashmap::DashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error};

use crate::topic::Topic;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync + 'static>;

struct Registered<E> {
    id: u64,
    listener: Listener<E>,
}

/// Proof of a registration, consumed by [`EventBus::unsubscribe`].
///
/// A handle identifies exactly one listener on one topic. Transport sessions
/// keep the handles they own and dispose of them when the session ends.
#[derive(Debug)]
pub struct SubscriptionHandle {
    topic: Topic,
    id: u64,
}

impl SubscriptionHandle {
    pub fn topic(&self) -> &Topic {
        &self.topic
    }
}

/// Topic-keyed broadcaster.
///
/// The registry tolerates concurrent subscribe/unsubscribe/publish: a publish
/// snapshots the listener list before invoking anyone, so removing a listener
/// mid-delivery is safe (an in-flight delivery to it may still complete).
/// Events published to a topic with no listeners are dropped.
pub struct EventBus<E> {
    topics: DashMap<Topic, Vec<Registered<E>>>,
    next_id: AtomicU64,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener for a topic.
    ///
    /// The listener observes every publish on the topic that starts strictly
    /// after this call returns, in publish order. A publish racing with the
    /// subscription may or may not be observed.
    pub fn subscribe(
        &self,
        topic: Topic,
        listener: impl Fn(&E) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.topics
            .entry(topic.clone())
            .or_default()
            .push(Registered {
                id,
                listener: Arc::new(listener),
            });
        debug!(topic = %topic, id, "listener subscribed");
        SubscriptionHandle { topic, id }
    }

    /// Remove a listener. Publishes starting after this returns will not
    /// reach it; the topic entry is dropped once its last listener leaves.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        if let Some(mut entry) = self.topics.get_mut(&handle.topic) {
            entry.retain(|r| r.id != handle.id);
            let empty = entry.is_empty();
            drop(entry);
            if empty {
                self.topics.remove_if(&handle.topic, |_, v| v.is_empty());
            }
        }
        debug!(topic = %handle.topic, id = handle.id, "listener unsubscribed");
    }

    /// Deliver an event to every listener currently registered on the topic.
    ///
    /// Listener invocations are isolated: a panic is caught, logged, and the
    /// remaining listeners still receive the event.
    pub fn publish(&self, topic: &Topic, event: &E) {
        let listeners: Vec<Listener<E>> = match self.topics.get(topic) {
            Some(entry) => entry.iter().map(|r| Arc::clone(&r.listener)).collect(),
            None => return,
        };

        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                error!(topic = %topic, "listener panicked during delivery");
            }
        }
    }

    /// Number of listeners on a topic (observability and tests)
    pub fn listener_count(&self, topic: &Topic) -> usize {
        self.topics.get(topic).map(|e| e.len()).unwrap_or(0)
    }

    /// Number of live topics
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn collector() -> (Arc<Mutex<Vec<String>>>, impl Fn(&String) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |e: &String| sink.lock().push(e.clone()))
    }

    #[test]
    fn fan_out_delivers_to_all_listeners_in_publish_order() {
        let bus = EventBus::<String>::new();
        let topic = Topic::named("t");
        let (seen_a, listener_a) = collector();
        let (seen_b, listener_b) = collector();
        let _ha = bus.subscribe(topic.clone(), listener_a);
        let _hb = bus.subscribe(topic.clone(), listener_b);

        bus.publish(&topic, &"first".to_string());
        bus.publish(&topic, &"second".to_string());

        assert_eq!(*seen_a.lock(), vec!["first", "second"]);
        assert_eq!(*seen_b.lock(), vec!["first", "second"]);
    }

    #[test]
    fn events_before_subscribe_are_not_replayed() {
        let bus = EventBus::<String>::new();
        let topic = Topic::named("t");
        bus.publish(&topic, &"lost".to_string());

        let (seen, listener) = collector();
        let _h = bus.subscribe(topic.clone(), listener);
        bus.publish(&topic, &"kept".to_string());

        assert_eq!(*seen.lock(), vec!["kept"]);
    }

    #[test]
    fn unsubscribe_stops_delivery_and_drops_empty_topic() {
        let bus = EventBus::<String>::new();
        let topic = Topic::named("t");
        let (seen, listener) = collector();
        let handle = bus.subscribe(topic.clone(), listener);
        assert_eq!(bus.topic_count(), 1);

        bus.publish(&topic, &"one".to_string());
        bus.unsubscribe(handle);
        bus.publish(&topic, &"two".to_string());

        assert_eq!(*seen.lock(), vec!["one"]);
        assert_eq!(bus.topic_count(), 0);
    }

    #[test]
    fn unsubscribing_one_listener_keeps_the_other() {
        let bus = EventBus::<String>::new();
        let topic = Topic::named("t");
        let (seen_a, listener_a) = collector();
        let (seen_b, listener_b) = collector();
        let ha = bus.subscribe(topic.clone(), listener_a);
        let _hb = bus.subscribe(topic.clone(), listener_b);

        bus.unsubscribe(ha);
        bus.publish(&topic, &"only-b".to_string());

        assert!(seen_a.lock().is_empty());
        assert_eq!(*seen_b.lock(), vec!["only-b"]);
        assert_eq!(bus.listener_count(&topic), 1);
    }

    #[test]
    fn panicking_listener_does_not_abort_the_fan_out() {
        let bus = EventBus::<String>::new();
        let topic = Topic::named("t");
        let _panicker = bus.subscribe(topic.clone(), |_: &String| panic!("listener bug"));
        let (seen, listener) = collector();
        let _h = bus.subscribe(topic.clone(), listener);

        bus.publish(&topic, &"survives".to_string());

        assert_eq!(*seen.lock(), vec!["survives"]);
    }

    #[test]
    fn topics_are_independent() {
        let bus = EventBus::<String>::new();
        let (seen, listener) = collector();
        let _h = bus.subscribe(Topic::named("a"), listener);

        bus.publish(&Topic::named("b"), &"elsewhere".to_string());

        assert!(seen.lock().is_empty());
    }
}
