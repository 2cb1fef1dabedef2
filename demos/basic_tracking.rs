//! Basic usage: construct a client from environment variables, track a
//! handful of events, and shut down cleanly.

use std::sync::Arc;

use evtrack_core::{Client, DispatcherConfig, FileStorage, ReqwestTransport};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("EVTRACK_API_KEY").unwrap_or_else(|_| "demo-key".to_string());
    let endpoint = std::env::var("EVTRACK_ENDPOINT")
        .unwrap_or_else(|_| "https://ingest.example.com/events".to_string());

    let config = DispatcherConfig::builder()
        .api_key(api_key)
        .endpoint(endpoint)
        .max_batch_size(20)
        .flush_interval(std::time::Duration::from_secs(2))
        .http_adapter(Arc::new(ReqwestTransport::new()))
        .storage_adapter(Arc::new(FileStorage::new(
            std::env::temp_dir().join("evtrack-demo-queue.json"),
        )))
        .build()?;

    let client = Client::construct(config);
    client.set_metadata("app_version", json!("1.0.0")).await;

    for i in 0..5 {
        let mut payload = serde_json::Map::new();
        payload.insert("index".to_string(), json!(i));
        client.track("demo_event", Some(payload), None).await;
    }

    println!("Queued 5 events, waiting for the timer-triggered flush...");
    tokio::time::sleep(std::time::Duration::from_secs(3)).await;

    client.flush().await;
    let metrics = client.metrics();
    println!(
        "delivered={} dropped={} requeued={} http_calls={}",
        metrics.delivered, metrics.dropped, metrics.requeued, metrics.http_calls
    );

    client.dispose().await;
    Ok(())
}
