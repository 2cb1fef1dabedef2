//! End-to-end lifecycle tests exercised through the public `Client` API,
//! using the in-memory adapters under `cfg(feature = "test-util")` in
//! place of real network and filesystem I/O.

#![cfg(feature = "test-util")]

use std::sync::Arc;

use evtrack_core::testing::{InMemoryStorage, RecordingLogger, ScriptedTransport};
use evtrack_core::{Client, DispatcherConfig};
use serde_json::json;

fn client(max_batch_size: usize, storage: InMemoryStorage) -> Client {
    let config = DispatcherConfig::builder()
        .api_key("key")
        .endpoint("https://example.com/ingest")
        .max_batch_size(max_batch_size)
        .http_adapter(Arc::new(ScriptedTransport::always(200)))
        .storage_adapter(Arc::new(storage))
        .logger_adapter(Arc::new(RecordingLogger::new()))
        .build()
        .unwrap();
    Client::construct(config)
}

#[tokio::test]
async fn track_flush_dispose_round_trip() {
    let client = client(10, InMemoryStorage::new());

    client.track("signup", None, None).await;
    client
        .track("purchase", Some(json!({"amount": 42}).as_object().unwrap().clone()), None)
        .await;
    assert_eq!(client.queue_len().await, 2);

    client.flush().await;
    assert_eq!(client.queue_len().await, 0);
    assert_eq!(client.metrics().delivered, 2);

    client.dispose().await;
    assert!(client.is_disposed());

    client.track("after-dispose", None, None).await;
    assert_eq!(client.queue_len().await, 0);
}

#[tokio::test]
async fn shared_metadata_is_attached_to_every_event() {
    let client = client(10, InMemoryStorage::new());
    client.set_metadata("env", json!("production")).await;
    client.set_metadata("app_version", json!("1.4.0")).await;

    client.track("page_view", None, None).await;
    client.flush().await;

    let snapshot = client.get_metadata().await;
    assert_eq!(snapshot.get("env"), Some(&json!("production")));
    assert_eq!(snapshot.get("app_version"), Some(&json!("1.4.0")));
}

#[tokio::test]
async fn close_is_an_alias_for_dispose() {
    let client = client(10, InMemoryStorage::new());
    client.init().await;
    client.close().await;
    assert!(client.is_disposed());
}

#[tokio::test]
async fn a_fresh_client_against_seeded_storage_recovers_its_backlog() {
    use evtrack_core::Event;
    use serde_json::Map;

    let storage = InMemoryStorage::seed(vec![
        Event::new("queued-before-restart", Map::new(), Map::new()),
        Event::new("also-queued", Map::new(), Map::new()),
    ]);
    let client = client(10, storage);

    client.init().await;
    assert_eq!(client.queue_len().await, 2);

    client.flush().await;
    assert_eq!(client.metrics().delivered, 2);
}
