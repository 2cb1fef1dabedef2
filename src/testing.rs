//! In-memory test doubles for the three external contracts (spec §6.3-6.5).
//!
//! Exposed behind `cfg(any(test, feature = "test-util"))` so both this
//! crate's own unit tests and downstream integration tests under `tests/`
//! can assert on call counts and bodies without a real network or
//! filesystem, mirroring the teacher's reliance on `mockito` but covering
//! the storage/logger adapters too, which `mockito` doesn't reach.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::event::Event;
use crate::logger::Logger;
use crate::storage::{Storage, StorageError};
use crate::transport::{HttpTransport, TransportError};

/// Records every batch handed to it and replies with a scripted sequence of
/// status codes, cycling the last entry once exhausted.
pub struct ScriptedTransport {
    responses: Mutex<Vec<u16>>,
    calls: Mutex<Vec<Vec<Event>>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<u16>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(status: u16) -> Self {
        Self::new(vec![status])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Vec<Event>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        _endpoint: &str,
        events: &[Event],
        _headers: &HashMap<String, String>,
        cancellation: &CancellationToken,
    ) -> Result<u16, TransportError> {
        if cancellation.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        self.calls.lock().unwrap().push(events.to_vec());
        let mut responses = self.responses.lock().unwrap();
        let status = if responses.len() > 1 {
            responses.remove(0)
        } else {
            *responses.first().unwrap_or(&200)
        };
        Ok(status)
    }
}

/// Always fails at the network layer; used to exercise the transport-error
/// retry path (spec §7).
#[derive(Default)]
pub struct AlwaysNetworkError;

#[async_trait]
impl HttpTransport for AlwaysNetworkError {
    async fn send(
        &self,
        _endpoint: &str,
        _events: &[Event],
        _headers: &HashMap<String, String>,
        cancellation: &CancellationToken,
    ) -> Result<u16, TransportError> {
        if cancellation.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        Err(TransportError::Network("connection refused".to_string()))
    }
}

/// In-memory stand-in for durable storage.
#[derive(Default)]
pub struct InMemoryStorage {
    events: Mutex<Vec<Event>>,
    save_count: Mutex<u64>,
    clear_count: Mutex<u64>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            save_count: Mutex::new(0),
            clear_count: Mutex::new(0),
        }
    }

    pub fn save_count(&self) -> u64 {
        *self.save_count.lock().unwrap()
    }

    pub fn clear_count(&self) -> u64 {
        *self.clear_count.lock().unwrap()
    }

    pub fn current(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save(&self, events: &[Event]) -> Result<(), StorageError> {
        *self.events.lock().unwrap() = events.to_vec();
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Event>, StorageError> {
        Ok(self.events.lock().unwrap().clone())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.events.lock().unwrap().clear();
        *self.clear_count.lock().unwrap() += 1;
        Ok(())
    }
}

/// Captures every message passed to it, tagged with severity.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(&'static str, String)> {
        self.lines.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.lines.lock().unwrap().push(("debug", message.to_string()));
    }

    fn info(&self, message: &str) {
        self.lines.lock().unwrap().push(("info", message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.lines.lock().unwrap().push(("warn", message.to_string()));
    }

    fn error(&self, message: &str) {
        self.lines.lock().unwrap().push(("error", message.to_string()));
    }
}
