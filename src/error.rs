//! Error types for the dispatcher core.
//!
//! Construction is the only error surface applications see (spec §4.1, §7).
//! Everything past that point — transport failures, storage failures,
//! unexpected status codes — is absorbed by the dispatcher and reported
//! only through the configured [`crate::logger::Logger`].

use thiserror::Error;

/// Errors surfaced to callers. Only ever returned from
/// [`crate::config::DispatcherConfig::build`] / client construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
