//! Error types for session and identity endpoint operations

/// Errors from session storage and identity endpoint operations.
///
/// `InvalidCredentials` is a result value for the login form, not a fault:
/// callers match on it to render the server's message. `RefreshRejected` is
/// terminal for the session — the coordinator reacts by tearing the session
/// down rather than surfacing it to the original caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("refresh token rejected: {0}")]
    RefreshRejected(String),

    #[error("identity endpoint error: {0}")]
    Endpoint(String),

    #[error("session store parse error: {0}")]
    StoreParse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
