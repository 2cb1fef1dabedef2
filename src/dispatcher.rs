//! The dispatcher: owns the queue, drives batching, the one-shot flush
//! timer, status-code-aware retry, and durable-buffer synchronization
//! (spec §4.2). The heart of the crate, structurally grounded on the
//! teacher's `Batcher` (`batcher.rs`) — background flush driven by a
//! single scheduled task rather than a worker thread, chunking into
//! batches, and a retry loop around a pluggable HTTP call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::DispatcherConfig;
use crate::event::Event;
use crate::metrics::{DispatcherMetrics, DispatcherMetricsSnapshot};
use crate::queue::Queue;
use crate::retry::{backoff, RandJitter};
use crate::storage::StorageError;
use crate::transport::TransportError;

/// How a single HTTP attempt's outcome maps onto spec §4.2 step 2.
enum Decision {
    Success,
    Drop(String),
    Retry,
}

fn classify_status(status: u16) -> Decision {
    match status {
        200..=299 => Decision::Success,
        400..=499 => Decision::Drop(format!("client error (status {status}), dropping events")),
        500..=599 => Decision::Retry,
        other => Decision::Drop(format!("unexpected status {other}, dropping events")),
    }
}

fn chunk_events(events: Vec<Event>, max_batch_size: usize) -> Vec<Vec<Event>> {
    events
        .chunks(max_batch_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Owns the queue, the flush mutex, the one-shot timer, the cancellation
/// token, and the three external adapters. See spec §4.2 for the full
/// state machine and retry contract.
pub struct Dispatcher {
    queue: Queue,
    flush_mutex: Mutex<()>,
    timer_handle: Mutex<Option<JoinHandle<()>>>,
    cancellation: Mutex<CancellationToken>,
    running: AtomicBool,
    config: DispatcherConfig,
    metrics: DispatcherMetrics,
}

impl Dispatcher {
    /// Constructs the dispatcher without starting its timer or loading
    /// durable state (spec §4.1: eager construction, lazy start).
    pub fn new(config: DispatcherConfig) -> Arc<Self> {
        Arc::new(Self {
            queue: Queue::new(),
            flush_mutex: Mutex::new(()),
            timer_handle: Mutex::new(None),
            cancellation: Mutex::new(CancellationToken::new()),
            running: AtomicBool::new(false),
            config,
            metrics: DispatcherMetrics::new(),
        })
    }

    pub fn metrics(&self) -> DispatcherMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn queue_len(&self) -> usize {
        self.queue.len().await
    }

    /// Append `event`, apply the buffer cap, mirror to durable storage,
    /// then either flush immediately or (re)arm the one-shot timer
    /// (spec §4.2 `enqueue`).
    pub async fn enqueue(self: &Arc<Self>, event: Event) {
        if !self.is_running() {
            self.config
                .logger_adapter
                .warn("dispatcher is disposed; dropping event");
            return;
        }

        self.queue.append(event).await;
        self.queue.apply_cap(self.config.max_buffer_size).await;
        self.metrics.record_enqueued(1);
        self.mirror_queue_to_storage().await;

        if self.queue.len().await >= self.config.max_batch_size {
            self.flush().await;
        } else {
            self.schedule_timer_if_absent().await;
        }
    }

    /// Drain the queue into batches and attempt delivery of each in
    /// enqueue order. Serialized by `flush_mutex`; a concurrent caller
    /// observes an empty queue and returns immediately (spec §5).
    pub async fn flush(self: &Arc<Self>) {
        if !self.is_running() {
            return;
        }

        let _guard = self.flush_mutex.lock().await;
        self.cancel_timer().await;

        if self.queue.is_empty().await {
            return;
        }

        let drained = self.queue.drain().await;
        let mut failed = Vec::new();
        for batch in chunk_events(drained, self.config.max_batch_size) {
            if let Some(batch) = self.send_with_retry(batch).await {
                failed.push(batch);
            }
        }

        if !failed.is_empty() {
            self.requeue_front(failed.into_iter().flatten().collect()).await;
        }
    }

    /// Load durable state into the queue, capped by `max_buffer_size`
    /// (keeping the most recent), install a fresh cancellation token, mark
    /// the dispatcher running, and schedule the timer if anything survived
    /// (spec §4.2 `restore`). Fresh→Running and Disposed→Running both go
    /// through here.
    pub async fn restore(self: &Arc<Self>) {
        let mut events = match self.config.storage_adapter.load().await {
            Ok(events) => events,
            Err(e) => {
                self.config
                    .logger_adapter
                    .error(&format!("failed to load durable state: {}", describe(&e)));
                Vec::new()
            }
        };

        if self.config.max_buffer_size > 0 && events.len() > self.config.max_buffer_size {
            let excess = events.len() - self.config.max_buffer_size;
            events.drain(0..excess);
        }
        self.queue.replace(events).await;

        *self.cancellation.lock().await = CancellationToken::new();
        self.running.store(true, Ordering::SeqCst);

        if !self.queue.is_empty().await {
            self.schedule_timer_if_absent().await;
        }
    }

    /// Cancel in-flight retries, stop the timer, wait for any in-progress
    /// flush to observe cancellation, then clear queue and durable state
    /// best-effort (spec §4.2 `dispose`).
    pub async fn dispose(self: &Arc<Self>) {
        self.running.store(false, Ordering::SeqCst);
        self.cancellation.lock().await.cancel();
        self.cancel_timer().await;

        // Waiting for the flush mutex blocks until any in-flight flush has
        // observed cancellation and returned.
        let _guard = self.flush_mutex.lock().await;

        self.queue.clear().await;
        if let Err(e) = self.config.storage_adapter.clear().await {
            self.config
                .logger_adapter
                .error(&format!("failed to clear durable storage on dispose: {}", describe(&e)));
        }
    }

    async fn current_cancellation(&self) -> CancellationToken {
        self.cancellation.lock().await.clone()
    }

    async fn schedule_timer_if_absent(self: &Arc<Self>) {
        let mut guard = self.timer_handle.lock().await;
        if guard.is_some() {
            return;
        }
        let weak = Arc::downgrade(self);
        let duration = self.config.flush_interval;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(dispatcher) = weak.upgrade() {
                *dispatcher.timer_handle.lock().await = None;
                dispatcher.flush().await;
            }
        });
        *guard = Some(handle);
    }

    async fn cancel_timer(&self) {
        if let Some(handle) = self.timer_handle.lock().await.take() {
            handle.abort();
        }
    }

    async fn mirror_queue_to_storage(&self) {
        let snapshot = self.queue.snapshot().await;
        if let Err(e) = self.config.storage_adapter.save(&snapshot).await {
            match e {
                StorageError::QuotaExceeded(msg) => {
                    self.config
                        .logger_adapter
                        .warn(&format!("durable storage quota exceeded: {msg}"));
                }
                StorageError::Other(msg) => {
                    self.config
                        .logger_adapter
                        .error(&format!("failed to persist queue: {msg}"));
                }
            }
        }
    }

    async fn clear_storage(&self) {
        if let Err(e) = self.config.storage_adapter.clear().await {
            self.config
                .logger_adapter
                .error(&format!("failed to clear durable storage: {}", describe(&e)));
        }
    }

    /// Place `events` at the front of the queue, preserving their relative
    /// order, apply the cap, and persist (spec §4.2 step 3, §5 ordering
    /// guarantees). Callers pass every failed batch from a single `flush()`
    /// concatenated in original order, so a single `flush()` never
    /// interleaves two failed batches' events relative to each other.
    async fn requeue_front(&self, events: Vec<Event>) {
        let count = events.len() as u64;
        self.queue.prepend(events).await;
        self.queue.apply_cap(self.config.max_buffer_size).await;
        self.mirror_queue_to_storage().await;
        self.metrics.record_requeued(count);
    }

    /// Spec §4.2 `sendWithRetry`: invoke the transport, classify the
    /// outcome, and either terminate the batch (success/drop) or retry
    /// with capped, jittered backoff up to `max_retries`. Returns `Some`
    /// with the batch itself if it must be requeued, so the caller can
    /// accumulate every failed batch from this `flush()` and requeue them
    /// together in original order (spec §4.2 step 3, §5).
    async fn send_with_retry(&self, batch: Vec<Event>) -> Option<Vec<Event>> {
        let mut attempt = 0u32;

        loop {
            let cancellation = self.current_cancellation().await;
            if cancellation.is_cancelled() {
                return Some(batch);
            }

            self.metrics.record_http_call();
            let headers = self.config.headers();
            let outcome = self
                .config
                .http_adapter
                .send(&self.config.endpoint, &batch, &headers, &cancellation)
                .await;

            let decision = match outcome {
                Ok(status) => classify_status(status),
                Err(TransportError::Cancelled) => return Some(batch),
                Err(TransportError::Network(_)) => Decision::Retry,
            };

            match decision {
                Decision::Success => {
                    self.config
                        .logger_adapter
                        .debug(&format!("delivered batch of {} events", batch.len()));
                    self.clear_storage().await;
                    self.metrics.record_delivered(batch.len() as u64);
                    return None;
                }
                Decision::Drop(reason) => {
                    self.config.logger_adapter.warn(&reason);
                    self.clear_storage().await;
                    self.metrics.record_dropped(batch.len() as u64);
                    return None;
                }
                Decision::Retry => {
                    if attempt >= self.config.max_retries {
                        return Some(batch);
                    }

                    let delay = backoff(attempt, &RandJitter);
                    tokio::select! {
                        biased;
                        _ = cancellation.cancelled() => {
                            return Some(batch);
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }
}

fn describe(e: &StorageError) -> String {
    match e {
        StorageError::QuotaExceeded(msg) | StorageError::Other(msg) => msg.clone(),
    }
}
