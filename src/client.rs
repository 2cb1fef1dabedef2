//! The public client surface (spec §4.1, §6.1): lifecycle, event
//! construction, and delegation to the [`Dispatcher`]. Structurally
//! grounded on the teacher's `LangfuseClient` — a thin builder-constructed
//! facade in front of the heavier background component (there: `Batcher`,
//! here: `Dispatcher`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::Mutex as AsyncMutex;

use crate::config::DispatcherConfig;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::event::{merge_metadata, Event};
use crate::metadata::MetadataManager;
use crate::metrics::DispatcherMetricsSnapshot;

/// Client-side event-tracking entry point. Construction is the only
/// fallible operation; every runtime method absorbs its own errors and
/// reports them only through the configured logger (spec §7).
pub struct Client {
    dispatcher: Arc<Dispatcher>,
    metadata: MetadataManager,
    initialized: AtomicBool,
    disposed: AtomicBool,
    init_lock: AsyncMutex<()>,
}

impl Client {
    /// Validates `config` and eagerly constructs the dispatcher, without
    /// starting its timer or loading durable state (spec §4.1 `construct`).
    pub fn construct(config: DispatcherConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(config),
            metadata: MetadataManager::new(),
            initialized: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            init_lock: AsyncMutex::new(()),
        }
    }

    /// Convenience constructor that also validates the config, returning
    /// the construction error if any (spec §6.1 `construct(config)`).
    pub fn try_construct(config: Result<DispatcherConfig>) -> Result<Self> {
        config.map(Self::construct)
    }

    /// Idempotent. Double-checked locking: a lock-free read short-circuits
    /// once initialized; otherwise the slow path restores durable state and
    /// flips the flag (spec §4.1 `init`).
    pub async fn init(&self) {
        if self.initialized.load(Ordering::SeqCst) {
            return;
        }

        let _guard = self.init_lock.lock().await;
        if self.initialized.load(Ordering::SeqCst) {
            return;
        }

        self.disposed.store(false, Ordering::SeqCst);
        self.dispatcher.restore().await;
        self.initialized.store(true, Ordering::SeqCst);
    }

    /// Construct an event and hand it to the dispatcher. A no-op, silent
    /// no-error operation once disposed; auto-initializes otherwise
    /// (spec §4.1 `track`). Never blocks on network I/O.
    pub async fn track(
        &self,
        name: impl Into<String>,
        payload: Option<Map<String, Value>>,
        metadata: Option<Map<String, Value>>,
    ) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        if !self.initialized.load(Ordering::SeqCst) {
            self.init().await;
        }

        let shared_metadata = self.metadata.get_all().await;
        let merged_metadata = merge_metadata(&shared_metadata, metadata);
        let event = Event::new(name, payload.unwrap_or_default(), merged_metadata);

        self.dispatcher.enqueue(event).await;
    }

    pub async fn set_metadata(&self, key: impl Into<String>, value: Value) {
        self.metadata.set(key, value).await;
    }

    pub async fn get_metadata(&self) -> Map<String, Value> {
        self.metadata.get_all().await
    }

    /// Always absent in this implementation (spec §3, §4.1).
    pub fn get_session_id(&self) -> Option<String> {
        None
    }

    /// Blocks until every currently queued event has been attempted at
    /// least once (spec §6.1). No error surface.
    pub async fn flush(&self) {
        self.dispatcher.flush().await;
    }

    /// Idempotent. Cancels in-flight retries, stops the timer, clears the
    /// queue and durable state, clears metadata, and flips the lifecycle
    /// flags. Does not flush (spec §4.1 `dispose`).
    pub async fn dispose(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        self.dispatcher.dispose().await;
        self.metadata.clear().await;
        self.disposed.store(true, Ordering::SeqCst);
        self.initialized.store(false, Ordering::SeqCst);
    }

    /// Alias for [`Client::dispose`], matching spec §6.1's `close()`.
    pub async fn close(&self) {
        self.dispose().await;
    }

    pub fn metrics(&self) -> DispatcherMetricsSnapshot {
        self.dispatcher.metrics()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    #[cfg(any(test, feature = "test-util"))]
    pub async fn queue_len(&self) -> usize {
        self.dispatcher.queue_len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryStorage, RecordingLogger, ScriptedTransport};
    use std::sync::Arc as StdArc;

    fn config(transport: ScriptedTransport, storage: InMemoryStorage) -> DispatcherConfig {
        let http_adapter: StdArc<dyn crate::transport::HttpTransport> = StdArc::new(transport);
        let storage_adapter: StdArc<dyn crate::storage::Storage> = StdArc::new(storage);
        let logger_adapter: StdArc<dyn crate::logger::Logger> = StdArc::new(RecordingLogger::new());
        DispatcherConfig::builder()
            .api_key("key")
            .endpoint("https://example.com/ingest")
            .max_batch_size(3)
            .http_adapter(http_adapter)
            .storage_adapter(storage_adapter)
            .logger_adapter(logger_adapter)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn track_after_dispose_is_a_silent_no_op() {
        let client = Client::construct(config(ScriptedTransport::always(200), InMemoryStorage::new()));
        client.init().await;
        client.dispose().await;

        client.track("noop", None, None).await;
        assert_eq!(client.queue_len().await, 0);
    }

    #[tokio::test]
    async fn init_called_twice_is_equivalent_to_once() {
        let client = Client::construct(config(ScriptedTransport::always(200), InMemoryStorage::new()));
        client.init().await;
        client.init().await;
        assert!(client.is_initialized());
    }

    #[tokio::test]
    async fn dispose_called_twice_is_idempotent() {
        let client = Client::construct(config(ScriptedTransport::always(200), InMemoryStorage::new()));
        client.init().await;
        client.dispose().await;
        client.dispose().await;
        assert!(client.is_disposed());
    }

    #[tokio::test]
    async fn track_auto_initializes() {
        let client = Client::construct(config(ScriptedTransport::always(200), InMemoryStorage::new()));
        assert!(!client.is_initialized());
        client.track("first", None, None).await;
        assert!(client.is_initialized());
    }

    #[tokio::test]
    async fn per_event_metadata_overrides_shared_metadata() {
        use serde_json::json;
        let client = Client::construct(config(ScriptedTransport::always(200), InMemoryStorage::new()));
        client.set_metadata("tier", json!("free")).await;

        let mut overlay = Map::new();
        overlay.insert("tier".to_string(), json!("paid"));
        client.track("upgrade", None, Some(overlay)).await;

        // tier stays "free" in the shared store; only the wire event used "paid".
        let snapshot = client.get_metadata().await;
        assert_eq!(snapshot.get("tier"), Some(&json!("free")));
    }

    #[tokio::test]
    async fn dispose_then_init_accepts_events_again() {
        let client = Client::construct(config(ScriptedTransport::always(200), InMemoryStorage::new()));
        client.init().await;
        client.dispose().await;

        client.init().await;
        assert!(client.is_initialized());
        assert!(!client.is_disposed());

        client.track("after-reinit", None, None).await;
        assert_eq!(client.queue_len().await, 1);
    }

    #[tokio::test]
    async fn restore_reloads_events_persisted_by_a_prior_session() {
        // Simulates a process restart: a fresh Client constructed against
        // storage a previous session already wrote to (spec §8 property 8,
        // §8 property 9: restore after save is identity, modulo the cap).
        use serde_json::Map as M;
        let storage = InMemoryStorage::seed(vec![Event::new("persisted", M::new(), M::new())]);
        let client = Client::construct(config(ScriptedTransport::always(200), storage));

        client.init().await;
        assert_eq!(client.queue_len().await, 1);
    }
}
