//! Logger contract (spec §6.5): four severities, no return value.

/// A pluggable sink for diagnostic messages. Never returns an error —
/// logging must never be a reason for the dispatcher to fail.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default logger, backed by the `tracing` crate.
#[derive(Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }

    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Plain `eprintln!`/`println!` logger at WARN, matching spec §6.2's
/// configured default for hosts with no `tracing` subscriber installed.
pub struct PrintLogger {
    min_level: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for PrintLogger {
    fn default() -> Self {
        Self {
            min_level: Level::Warn,
        }
    }
}

impl Logger for PrintLogger {
    fn debug(&self, message: &str) {
        if self.min_level <= Level::Debug {
            println!("[DEBUG] {message}");
        }
    }

    fn info(&self, message: &str) {
        if self.min_level <= Level::Info {
            println!("[INFO] {message}");
        }
    }

    fn warn(&self, message: &str) {
        if self.min_level <= Level::Warn {
            eprintln!("[WARN] {message}");
        }
    }

    fn error(&self, message: &str) {
        if self.min_level <= Level::Error {
            eprintln!("[ERROR] {message}");
        }
    }
}
