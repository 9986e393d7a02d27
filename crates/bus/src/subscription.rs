use std::sync::Arc;
use tokio::sync::mpsc;

use crate::hub::{EventBus, SubscriptionHandle};
use crate::topic::Topic;

/// Channel-backed subscription for asynchronous consumers.
///
/// Registers a forwarding listener on the bus and hands events over an
/// unbounded channel, so a slow consumer never stalls the publisher. The
/// registration is released when the subscription is dropped, which is how a
/// transport session cleans up on disconnect.
pub struct TopicSubscription<E> {
    bus: Arc<EventBus<E>>,
    handle: Option<SubscriptionHandle>,
    rx: mpsc::UnboundedReceiver<E>,
}

impl<E: Clone + Send + 'static> TopicSubscription<E> {
    pub fn new(bus: &Arc<EventBus<E>>, topic: Topic) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = bus.subscribe(topic, move |event: &E| {
            // Receiver gone means the subscription is mid-drop; ignore.
            let _ = tx.send(event.clone());
        });
        Self {
            bus: Arc::clone(bus),
            handle: Some(handle),
            rx,
        }
    }

    /// Topic this subscription listens on
    pub fn topic(&self) -> Option<&Topic> {
        self.handle.as_ref().map(|h| h.topic())
    }

    /// Wait for the next event
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    /// Take an event if one is already queued
    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }
}

impl<E> Drop for TopicSubscription<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.bus.unsubscribe(handle);
        }
    }
}
