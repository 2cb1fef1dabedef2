//! Retry backoff policy (spec §4.5): a pure function from attempt number to
//! delay, with an injectable jitter source for deterministic tests.

use std::time::Duration;

const BASE_SECS: u64 = 1;
const CAP_SECS: u64 = 30;

/// Source of jitter in `[0, 1)` seconds, injectable so tests can pin it.
pub trait JitterSource: Send + Sync {
    fn sample(&self) -> f64;
}

/// Default jitter source backed by `rand`.
#[derive(Default)]
pub struct RandJitter;

impl JitterSource for RandJitter {
    fn sample(&self) -> f64 {
        use rand::Rng;
        rand::rng().random_range(0.0..1.0)
    }
}

/// `delay(attempt) = min(2^attempt seconds, 30 seconds) + jitter_seconds`,
/// jitter uniform in `[0, 1)` and purely additive (spec §4.5).
pub fn backoff(attempt: u32, jitter: &dyn JitterSource) -> Duration {
    let exp = BASE_SECS.checked_shl(attempt).unwrap_or(u64::MAX);
    let capped_secs = exp.min(CAP_SECS);
    let jitter_secs = jitter.sample().clamp(0.0, f64::from(u32::MAX));
    Duration::from_secs(capped_secs) + Duration::from_secs_f64(jitter_secs)
}

#[cfg(test)]
pub(crate) struct FixedJitter(pub f64);

#[cfg(test)]
impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}
