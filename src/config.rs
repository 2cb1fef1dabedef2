//! Configuration (spec §6.2), validated at `build()` time rather than on
//! first use, matching the teacher's `LangfuseClient::builder`.

use std::sync::Arc;
use std::time::Duration;

use bon::bon;

use crate::error::{Error, Result};
use crate::logger::{Logger, PrintLogger};
use crate::secret::ApiKey;
use crate::storage::Storage;
use crate::transport::HttpTransport;

const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_BATCH_SIZE: usize = 10;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Validated, immutable dispatcher configuration.
pub struct DispatcherConfig {
    pub api_key: ApiKey,
    pub endpoint: String,
    pub api_key_header: String,
    pub flush_interval: Duration,
    pub max_batch_size: usize,
    pub max_retries: u32,
    pub max_buffer_size: usize,
    pub http_adapter: Arc<dyn HttpTransport>,
    pub storage_adapter: Arc<dyn Storage>,
    pub logger_adapter: Arc<dyn Logger>,
}

#[bon]
impl DispatcherConfig {
    #[builder]
    pub fn new(
        #[builder(into)] api_key: String,
        #[builder(into)] endpoint: String,
        api_key_header: Option<String>,
        flush_interval: Option<Duration>,
        max_batch_size: Option<usize>,
        max_retries: Option<u32>,
        max_buffer_size: Option<usize>,
        http_adapter: Arc<dyn HttpTransport>,
        storage_adapter: Arc<dyn Storage>,
        logger_adapter: Option<Arc<dyn Logger>>,
    ) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Configuration("apiKey must not be empty".into()));
        }
        if endpoint.is_empty() {
            return Err(Error::Configuration("endpoint must not be empty".into()));
        }

        let api_key_header = api_key_header.unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string());
        if api_key_header.is_empty() {
            return Err(Error::Configuration(
                "apiKeyHeader must not be empty".into(),
            ));
        }

        let flush_interval = flush_interval.unwrap_or(DEFAULT_FLUSH_INTERVAL);

        let max_batch_size = max_batch_size.unwrap_or(DEFAULT_MAX_BATCH_SIZE);
        if max_batch_size < 1 {
            return Err(Error::Configuration("maxBatchSize must be >= 1".into()));
        }

        let max_retries = max_retries.unwrap_or(DEFAULT_MAX_RETRIES);

        let max_buffer_size = max_buffer_size.unwrap_or(0);
        if max_buffer_size > 0 && max_buffer_size < max_batch_size {
            return Err(Error::Configuration(
                "maxBufferSize must be 0 (unlimited) or >= maxBatchSize".into(),
            ));
        }

        Ok(Self {
            api_key: ApiKey::new(api_key),
            endpoint,
            api_key_header,
            flush_interval,
            max_batch_size,
            max_retries,
            max_buffer_size,
            http_adapter,
            storage_adapter,
            logger_adapter: logger_adapter.unwrap_or_else(|| Arc::new(PrintLogger::default())),
        })
    }

    /// Precomputed header map carrying the API key, per spec §4.2.
    pub(crate) fn headers(&self) -> std::collections::HashMap<String, String> {
        let mut headers = std::collections::HashMap::with_capacity(1);
        headers.insert(self.api_key_header.clone(), self.api_key.expose().to_string());
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FileStorage;
    use crate::transport::ReqwestTransport;

    fn adapters() -> (Arc<dyn HttpTransport>, Arc<dyn Storage>) {
        (
            Arc::new(ReqwestTransport::new()),
            Arc::new(FileStorage::new(std::env::temp_dir().join("evtrack-config-test.json"))),
        )
    }

    #[test]
    fn rejects_buffer_smaller_than_batch() {
        let (http, storage) = adapters();
        let result = DispatcherConfig::builder()
            .api_key("key")
            .endpoint("https://example.com")
            .max_batch_size(10)
            .max_buffer_size(5)
            .http_adapter(http)
            .storage_adapter(storage)
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_empty_api_key() {
        let (http, storage) = adapters();
        let result = DispatcherConfig::builder()
            .api_key("")
            .endpoint("https://example.com")
            .http_adapter(http)
            .storage_adapter(storage)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn defaults_apply_when_unset() {
        let (http, storage) = adapters();
        let config = DispatcherConfig::builder()
            .api_key("key")
            .endpoint("https://example.com")
            .http_adapter(http)
            .storage_adapter(storage)
            .build()
            .unwrap();
        assert_eq!(config.api_key_header, "X-API-Key");
        assert_eq!(config.max_batch_size, DEFAULT_MAX_BATCH_SIZE);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.max_buffer_size, 0);
    }

    #[test]
    fn buffer_equal_to_batch_is_allowed() {
        let (http, storage) = adapters();
        let config = DispatcherConfig::builder()
            .api_key("key")
            .endpoint("https://example.com")
            .max_batch_size(10)
            .max_buffer_size(10)
            .http_adapter(http)
            .storage_adapter(storage)
            .build()
            .unwrap();
        assert_eq!(config.max_buffer_size, 10);
    }
}
