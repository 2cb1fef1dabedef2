//! The [`Event`] record and its wire/persisted representation (spec §3, §6.6, §6.7).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Constant platform tag attached to every event produced by this crate.
///
/// Serializes to `{"type":"server"}` per spec §6.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Platform {
    Server,
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Server
    }
}

/// A timestamped, named record with payload and metadata, destined for the
/// ingestion endpoint.
///
/// `session_id` is always absent in this implementation; the field is
/// reserved (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub issued_at: i64,
    pub session_id: Option<String>,
    pub platform: Platform,
}

impl Event {
    /// Construct an event with `issued_at` set to the current wall clock,
    /// in milliseconds since the epoch, and `session_id` absent.
    pub fn new(name: impl Into<String>, payload: Map<String, Value>, metadata: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            payload,
            metadata,
            issued_at: now_millis(),
            session_id: None,
            platform: Platform::Server,
        }
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Shallow-merge two metadata maps: `base` first, `overlay` second
/// (overlay's keys win on conflict). Mirrors spec §4.1's
/// "shared metadata snapshot first, per-event metadata second" rule.
pub fn merge_metadata(base: &Map<String, Value>, overlay: Option<Map<String, Value>>) -> Map<String, Value> {
    let mut merged = base.clone();
    if let Some(overlay) = overlay {
        for (k, v) in overlay {
            merged.insert(k, v);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_empty_payload_and_metadata_as_empty_objects() {
        let event = Event::new("signup", Map::new(), Map::new());
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["payload"], json!({}));
        assert_eq!(value["metadata"], json!({}));
        assert_eq!(value["sessionId"], Value::Null);
    }

    #[test]
    fn merge_metadata_overlay_wins() {
        let mut base = Map::new();
        base.insert("env".to_string(), json!("prod"));
        base.insert("tier".to_string(), json!("free"));

        let mut overlay = Map::new();
        overlay.insert("tier".to_string(), json!("paid"));

        let merged = merge_metadata(&base, Some(overlay));
        assert_eq!(merged["env"], json!("prod"));
        assert_eq!(merged["tier"], json!("paid"));
    }

    #[test]
    fn merge_metadata_none_overlay_keeps_base() {
        let mut base = Map::new();
        base.insert("env".to_string(), json!("prod"));
        let merged = merge_metadata(&base, None);
        assert_eq!(merged, base);
    }
}
