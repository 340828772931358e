//! Client-side error types

use thiserror::Error;

/// Errors surfaced to API callers.
///
/// `SessionExpired` is what every request queued behind a failed refresh
/// resolves to; callers treat it like an unrecoverable 401 — by then the
/// session is already cleared and the user routed to login, so there is
/// nothing to retry. Non-auth HTTP statuses are not errors at this layer:
/// they pass through inside `ApiResponse` for the calling store to handle.
#[derive(Error, Debug)]
pub enum Error {
    #[error("session expired")]
    SessionExpired,

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("response decode error: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias using client Error
pub type Result<T> = std::result::Result<T, Error>;
