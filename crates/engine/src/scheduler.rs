//! Deferred settlement queue.
//!
//! Orders are settled "accepted now, resolved later": acceptance pushes a
//! work item here and a poller drains whatever has come due against the
//! injected clock. Keying items by order id makes them cancellable, and
//! keeping time external makes settlement deterministic under a fixed clock.

use parking_lot::Mutex;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

use plutus_core::{OrderId, Timestamp};

/// Cancellable deferred work items keyed by order id, earliest due first
pub struct SettlementScheduler {
    queue: Mutex<PriorityQueue<OrderId, Reverse<Timestamp>>>,
}

impl SettlementScheduler {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(PriorityQueue::new()),
        }
    }

    /// Enqueue an order for settlement at `due_at`.
    ///
    /// Re-scheduling an already-queued id moves its due time.
    pub fn schedule(&self, order_id: OrderId, due_at: Timestamp) {
        self.queue.lock().push(order_id, Reverse(due_at));
    }

    /// Remove a pending item; returns whether it was still queued
    pub fn cancel(&self, order_id: &OrderId) -> bool {
        self.queue.lock().remove(order_id).is_some()
    }

    /// Pop every item due at or before `now`, earliest first
    pub fn due(&self, now: Timestamp) -> Vec<OrderId> {
        let mut queue = self.queue.lock();
        let mut ready = Vec::new();
        while queue
            .peek()
            .is_some_and(|(_, Reverse(due_at))| *due_at <= now)
        {
            if let Some((order_id, _)) = queue.pop() {
                ready.push(order_id);
            }
        }
        ready
    }

    /// Due time of the next item, if any
    pub fn next_due(&self) -> Option<Timestamp> {
        self.queue.lock().peek().map(|(_, Reverse(due_at))| *due_at)
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl Default for SettlementScheduler {
    fn default() -> Self {
        Self::new()
    }
}
