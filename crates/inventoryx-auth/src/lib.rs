//! Inventoryx session authentication library
//!
//! Provides the session data model, durable credential storage, the identity
//! endpoint gateway (login / refresh), and the route-level session guard for
//! the inventoryx API client. This crate is a standalone library with no
//! dependency on the request-interceptor layer — the gateway talks straight
//! to the identity endpoint, which is what breaks the interceptor → refresh →
//! gateway dependency cycle.
//!
//! Session lifecycle:
//! 1. Caller authenticates via `gateway::login()` and commits the payload
//!    with `CredentialStore::set_session()`
//! 2. Outbound requests read the access token via `CredentialStore::get()`
//! 3. On an observed 401, the coordinator calls `gateway::refresh()` and
//!    commits the new payload via `set_session()`
//! 4. Refresh failure or explicit logout calls `CredentialStore::clear()`,
//!    which routes the user to login through the injected `Navigator`
//! 5. TTL expiry of a stored field reads as absent (silent logout)

pub mod constants;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod navigator;
pub mod secret;
pub mod session;
pub mod store;

pub use constants::*;
pub use error::{Error, Result};
pub use gateway::{login, refresh};
pub use guard::{GuardDecision, SessionGuard};
pub use navigator::{Navigator, NoopNavigator, Route};
pub use secret::Secret;
pub use session::{AuthResponse, LoginCommand, Session};
pub use store::CredentialStore;
