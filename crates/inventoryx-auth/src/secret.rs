//! Redacted wrapper for the login password
//!
//! The password transits command structs and tracing-instrumented call paths
//! on its way to the identity endpoint; it must never reach `Debug` output,
//! log lines, or disk. Deliberately not generic: tokens persist to the 0600
//! session file and are compared in tests, so they stay plain strings — the
//! password is the one value with no business outside the gateway's request
//! body.

use std::fmt;
use zeroize::Zeroize;

/// Password in transit — redacted in Debug/Display, zeroed on drop.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner value. Only the gateway should need this, at the
    /// point the password is serialized into a request body.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
