//! Thread-safe FIFO event queue (spec §3, §4.3).

use std::collections::VecDeque;
use tokio::sync::Mutex;

use crate::event::Event;

/// Bounded-by-policy, not bounded-by-type, FIFO of [`Event`]s.
///
/// The cap itself (spec's `MaxBufferSize`) is enforced by the dispatcher,
/// which owns this queue; `Queue` only guarantees FIFO order and atomic
/// drain/replace.
#[derive(Default)]
pub struct Queue {
    inner: Mutex<VecDeque<Event>>,
}

impl Queue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn append(&self, event: Event) {
        self.inner.lock().await.push_back(event);
    }

    /// Insert events at the front, preserving their relative order
    /// (spec §4.2 step 3: re-queued batches go to the front).
    pub async fn prepend(&self, events: Vec<Event>) {
        let mut guard = self.inner.lock().await;
        for event in events.into_iter().rev() {
            guard.push_front(event);
        }
    }

    /// Atomically empty the queue, returning its prior contents in order.
    pub async fn drain(&self) -> Vec<Event> {
        let mut guard = self.inner.lock().await;
        guard.drain(..).collect()
    }

    /// Read-only snapshot; does not mutate the queue.
    pub async fn snapshot(&self) -> Vec<Event> {
        self.inner.lock().await.iter().cloned().collect()
    }

    /// Atomic clear + bulk append (used by `restore`, spec §4.2).
    pub async fn replace(&self, events: Vec<Event>) {
        let mut guard = self.inner.lock().await;
        guard.clear();
        guard.extend(events);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    /// FIFO eviction: drop from the front until `len <= cap` (spec §4.2
    /// buffer cap policy). `cap == 0` means unlimited, a no-op.
    pub async fn apply_cap(&self, cap: usize) {
        if cap == 0 {
            return;
        }
        let mut guard = self.inner.lock().await;
        while guard.len() > cap {
            guard.pop_front();
        }
    }
}
