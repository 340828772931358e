//! Inventoryx API client with transparent token refresh
//!
//! Wraps every outbound call to the inventoryx REST API: attaches the
//! current access token, observes 401 responses, and recovers through a
//! single-flight refresh so that any number of concurrent failures produce
//! exactly one refresh call.
//!
//! Request flow:
//! 1. Caller issues a request through `ApiClient`
//! 2. Pre-send: the current access token is attached as a bearer credential
//! 3. Post-receive: a 401 on the first attempt hands the request to the
//!    `RefreshCoordinator`; any other status passes through unchanged
//! 4. The coordinator runs at most one refresh, commits the new session,
//!    and replays queued requests in FIFO order with the new token
//! 5. On refresh failure the session is cleared once and every queued
//!    caller fails with `SessionExpired`
//!
//! Callers must not implement their own retry-on-401 logic; a single 401 is
//! transparently retried at most once.

pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod session;

pub use api::{ApiClient, ApiResponse};
pub use config::ClientConfig;
pub use coordinator::RefreshCoordinator;
pub use error::{Error, Result};
pub use session::SessionService;
