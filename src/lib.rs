//! # evtrack-core
//!
//! Core of a client-side event-tracking dispatcher: accepts fire-and-forget
//! event records from application code and delivers them — in batches,
//! with bounded memory, durable buffering, and disciplined retries — to a
//! remote HTTP ingestion endpoint.
//!
//! The hard engineering lives in two places:
//!
//! - [`Dispatcher`] coordinates an in-memory [`Queue`], a durable buffer, a
//!   batch-triggered and timer-triggered flush, and a status-code-aware
//!   retry loop.
//! - [`Client`] is the public surface: lifecycle (init/dispose/re-init),
//!   event construction, and delegation to the dispatcher.
//!
//! HTTP transport, durable storage, and logging are pluggable adapters
//! (see [`HttpTransport`], [`Storage`], [`Logger`]); this crate ships a
//! `reqwest`-backed transport and a single-file JSON storage adapter as
//! defaults, but applications may substitute their own.
//!
//! ## Quick start
//!
//! ```no_run
//! use evtrack_core::{Client, DispatcherConfig, FileStorage, ReqwestTransport};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DispatcherConfig::builder()
//!     .api_key("secret")
//!     .endpoint("https://ingest.example.com/events")
//!     .http_adapter(Arc::new(ReqwestTransport::new()))
//!     .storage_adapter(Arc::new(FileStorage::new("/tmp/evtrack-events.json")))
//!     .build()?;
//!
//! let client = Client::construct(config);
//! client.track("signup", None, None).await;
//! client.flush().await;
//! client.dispose().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Non-goals
//!
//! Guaranteed exactly-once delivery, server-side schema validation,
//! cross-process coordination, encryption of persisted events, content
//! inspection beyond JSON serialization, and multi-endpoint fan-out are
//! all out of scope for this crate.

#![warn(rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod logger;
pub mod metadata;
pub mod metrics;
pub mod queue;
pub mod retry;
pub mod secret;
pub mod storage;
pub mod transport;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::Client;
pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use event::{Event, Platform};
pub use logger::{Logger, PrintLogger, TracingLogger};
pub use metadata::MetadataManager;
pub use metrics::{DispatcherMetrics, DispatcherMetricsSnapshot};
pub use queue::Queue;
pub use retry::{backoff, JitterSource, RandJitter};
pub use secret::ApiKey;
pub use storage::{FileStorage, Storage, StorageError};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
