//! A narrow version of the teacher's `SecretString`: redacts the API key in
//! `Debug`/`Display` so configs can be logged/debug-printed safely. Unlike
//! the teacher's `Redactor`, this crate doesn't scan free text for secrets —
//! events are structured JSON the application controls, not prose.

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(***REDACTED***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        ApiKey::new(value)
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        ApiKey::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_and_display_redact() {
        let key = ApiKey::new("sk-super-secret");
        assert_eq!(format!("{:?}", key), "ApiKey(***REDACTED***)");
        assert_eq!(format!("{}", key), "***REDACTED***");
        assert_eq!(key.expose(), "sk-super-secret");
    }
}
