//! Concurrent metadata store shared across every tracked event (spec §4.4).

use serde_json::{Map, Value};
use tokio::sync::RwLock;

/// Readers get an isolated snapshot copy; writers take an exclusive lock.
/// `get_all` never returns a shared reference and never reports absence —
/// an empty map stands in for "no data" (spec §4.4).
#[derive(Default)]
pub struct MetadataManager {
    inner: RwLock<Map<String, Value>>,
}

impl MetadataManager {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Map::new()),
        }
    }

    pub async fn set(&self, key: impl Into<String>, value: Value) {
        self.inner.write().await.insert(key.into(), value);
    }

    pub async fn get_all(&self) -> Map<String, Value> {
        self.inner.read().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_and_get_all_roundtrip() {
        let store = MetadataManager::new();
        store.set("env", json!("staging")).await;
        let snapshot = store.get_all().await;
        assert_eq!(snapshot.get("env"), Some(&json!("staging")));
    }

    #[tokio::test]
    async fn get_all_is_never_none_when_empty() {
        let store = MetadataManager::new();
        let snapshot = store.get_all().await;
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn snapshot_is_isolated_from_future_writes() {
        let store = MetadataManager::new();
        store.set("a", json!(1)).await;
        let snapshot = store.get_all().await;
        store.set("a", json!(2)).await;
        assert_eq!(snapshot.get("a"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let store = MetadataManager::new();
        store.set("a", json!(1)).await;
        store.clear().await;
        assert!(store.is_empty().await);
    }
}
