//! Durable storage contract (spec §6.4) and the default file-based
//! implementation.
//!
//! Grounded on the JSON-event-file buffering pattern used by
//! `flox-flox`'s metrics module: a single file holding a JSON array of
//! buffered records, written wholesale and read back wholesale.

use async_trait::async_trait;

use crate::event::Event;

#[derive(Debug)]
pub enum StorageError {
    /// The storage medium is full or over its quota. The dispatcher
    /// downgrades this to a warning log rather than treating it as fatal
    /// (spec §7).
    QuotaExceeded(String),
    Other(String),
}

/// Pluggable durable storage. `save` atomically overwrites the persisted
/// set; `load` returns the most recently persisted sequence or empty;
/// `clear` is idempotent (spec §6.4).
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save(&self, events: &[Event]) -> Result<(), StorageError>;
    async fn load(&self) -> Result<Vec<Event>, StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Single-file JSON-array storage, written with 0o644 permissions
/// (spec §6.7).
pub struct FileStorage {
    path: std::path::PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn save(&self, events: &[Event]) -> Result<(), StorageError> {
        let serialized =
            serde_json::to_vec(events).map_err(|e| StorageError::Other(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StorageError::Other(e.to_string()))?;
            }
        }

        tokio::fs::write(&self.path, &serialized)
            .await
            .map_err(classify_write_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o644);
            let _ = tokio::fs::set_permissions(&self.path, permissions).await;
        }

        Ok(())
    }

    async fn load(&self) -> Result<Vec<Event>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(Vec::new());
                }
                serde_json::from_slice(&bytes).map_err(|e| StorageError::Other(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StorageError::Other(e.to_string())),
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Other(e.to_string())),
        }
    }
}

const ENOSPC: i32 = 28;

fn classify_write_error(e: std::io::Error) -> StorageError {
    if e.raw_os_error() == Some(ENOSPC) {
        StorageError::QuotaExceeded(e.to_string())
    } else {
        StorageError::Other(e.to_string())
    }
}
