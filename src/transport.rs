//! HTTP transport contract (spec §6.3) and the default `reqwest`-backed
//! implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::event::Event;

/// A transport call either returns a numeric status code, or fails at the
/// network layer before any status was observed.
#[derive(Debug)]
pub enum TransportError {
    Network(String),
    /// The cancellation token fired while the call was outstanding.
    Cancelled,
}

/// Pluggable HTTP transport. Implementations MUST serialize `events` as
/// `{"events": [...]}`, POST with `Content-Type: application/json`, attach
/// every header, observe `cancellation`, and MUST NOT retry internally
/// (spec §6.3) — retrying is the dispatcher's job.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        endpoint: &str,
        events: &[Event],
        headers: &HashMap<String, String>,
        cancellation: &CancellationToken,
    ) -> Result<u16, TransportError>;
}

/// Default transport, backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        endpoint: &str,
        events: &[Event],
        headers: &HashMap<String, String>,
        cancellation: &CancellationToken,
    ) -> Result<u16, TransportError> {
        let body = serde_json::json!({ "events": events });

        let mut request = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(&body);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(TransportError::Cancelled),
            result = request.send() => {
                let response = result.map_err(|e| TransportError::Network(e.to_string()))?;
                Ok(response.status().as_u16())
            }
        }
    }
}
