//! Substituting every pluggable adapter: a custom `HttpTransport` that logs
//! instead of making network calls, a custom `Storage` backed by an
//! in-memory vector, and a custom `Logger` that writes structured lines.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use evtrack_core::{
    Client, DispatcherConfig, Event, HttpTransport, Logger, Storage, StorageError, TransportError,
};
use tokio_util::sync::CancellationToken;

struct StdoutTransport {
    calls: AtomicU64,
}

#[async_trait]
impl HttpTransport for StdoutTransport {
    async fn send(
        &self,
        endpoint: &str,
        events: &[Event],
        _headers: &HashMap<String, String>,
        cancellation: &CancellationToken,
    ) -> Result<u16, TransportError> {
        if cancellation.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        println!("would POST {} events to {endpoint}", events.len());
        Ok(200)
    }
}

#[derive(Default)]
struct MemoryStorage {
    events: Mutex<Vec<Event>>,
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn save(&self, events: &[Event]) -> Result<(), StorageError> {
        *self.events.lock().unwrap() = events.to_vec();
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Event>, StorageError> {
        Ok(self.events.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.events.lock().unwrap().clear();
        Ok(())
    }
}

struct StderrLogger;

impl Logger for StderrLogger {
    fn debug(&self, message: &str) {
        eprintln!("[debug] {message}");
    }

    fn info(&self, message: &str) {
        eprintln!("[info] {message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("[warn] {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("[error] {message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DispatcherConfig::builder()
        .api_key("unused-by-this-transport")
        .endpoint("https://ingest.example.com/events")
        .max_batch_size(2)
        .http_adapter(Arc::new(StdoutTransport {
            calls: AtomicU64::new(0),
        }))
        .storage_adapter(Arc::new(MemoryStorage::default()))
        .logger_adapter(Arc::new(StderrLogger))
        .build()?;

    let client = Client::construct(config);
    client.track("first", None, None).await;
    client.track("second", None, None).await;

    client.flush().await;
    println!("delivered: {}", client.metrics().delivered);

    client.dispose().await;
    Ok(())
}
