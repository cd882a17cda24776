//! In-process publish/subscribe for snapshot and clock notifications.
//!
//! Each subscriber owns an unbounded queue, so delivery within a stream
//! follows publish order. The snapshot and clock streams are independent
//! topics with no ordering between them.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

use super::snapshot::Snapshot;
use super::store::ClockTime;

struct TopicState<T> {
    next_id: u64,
    subscribers: BTreeMap<u64, mpsc::UnboundedSender<T>>,
}

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Topic<T> {
    state: Arc<Mutex<TopicState<T>>>,
}

impl<T> Default for Topic<T> {
    fn default() -> Self {
        Topic {
            state: Arc::new(Mutex::new(TopicState {
                next_id: 0,
                subscribers: BTreeMap::new(),
            })),
        }
    }
}

impl<T: Clone> Topic<T> {
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.insert(id, tx);
        Subscription {
            id,
            rx,
            topic: Arc::downgrade(&self.state),
            active: true,
        }
    }

    /// Deliver `value` to every live subscriber; returns how many received it.
    ///
    /// The topic lock is held for the whole fan-out, so an unsubscribe either
    /// completes before delivery starts or after it ends.
    pub fn publish(&self, value: T) -> usize {
        let mut state = lock(&self.state);
        state
            .subscribers
            .retain(|_, tx| tx.send(value.clone()).is_ok());
        state.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }
}

pub struct Subscription<T> {
    id: u64,
    rx: mpsc::UnboundedReceiver<T>,
    topic: Weak<Mutex<TopicState<T>>>,
    active: bool,
}

impl<T> Subscription<T> {
    /// Next event, or `None` once unsubscribed or the bus is gone.
    pub async fn recv(&mut self) -> Option<T> {
        if !self.active {
            return None;
        }
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<T> {
        if !self.active {
            return None;
        }
        self.rx.try_recv().ok()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Idempotent. Events queued but not yet received are discarded.
    pub fn unsubscribe(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(state) = self.topic.upgrade() {
            lock(&state).subscribers.remove(&self.id);
        }
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[derive(Default)]
pub struct SubscriptionBus {
    snapshots: Topic<Arc<Snapshot>>,
    clock: Topic<ClockTime>,
}

impl SubscriptionBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_snapshots(&self) -> Subscription<Arc<Snapshot>> {
        self.snapshots.subscribe()
    }

    pub fn subscribe_clock(&self) -> Subscription<ClockTime> {
        self.clock.subscribe()
    }

    pub fn publish_snapshot(&self, snapshot: Arc<Snapshot>) -> usize {
        self.snapshots.publish(snapshot)
    }

    pub fn publish_clock(&self, time: ClockTime) -> usize {
        self.clock.publish(time)
    }

    pub fn snapshot_subscribers(&self) -> usize {
        self.snapshots.subscriber_count()
    }

    pub fn clock_subscribers(&self) -> usize {
        self.clock.subscriber_count()
    }
}
