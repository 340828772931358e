//! Login and logout session service
//!
//! The explicit entry points of the session lifecycle: `login` exchanges
//! credentials through the gateway and commits the payload to the store,
//! `logout` tears the session down. `InvalidCredentials` comes back as a
//! result value so the login form can render the server's message — it is
//! the one authentication failure that is part of normal operation.

use std::sync::Arc;

use inventoryx_auth::store::CredentialStore;
use inventoryx_auth::{self as auth, LoginCommand, Session, gateway};
use tracing::info;

/// Login/logout operations bound to a store and the identity endpoint.
///
/// Shares the reqwest client with `ApiClient` — the gateway bypasses the
/// interceptor by construction, so there is no recursion hazard in sharing
/// the connection pool.
pub struct SessionService {
    http: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
}

impl SessionService {
    pub fn new(http: reqwest::Client, base_url: String, store: Arc<CredentialStore>) -> Self {
        Self {
            http,
            base_url,
            store,
        }
    }

    /// Authenticate and commit the session. On success the store holds the
    /// new tokens, roles, and profile fields atomically.
    pub async fn login(&self, command: &LoginCommand) -> auth::Result<Session> {
        let auth_data = gateway::login(&self.http, &self.base_url, command).await?;
        self.store.set_session(&auth_data).await?;
        info!(username = %auth_data.username, "logged in");
        Ok(self.store.get().await)
    }

    /// Clear the session and route to login.
    pub async fn logout(&self) -> auth::Result<()> {
        info!("logging out");
        self.store.clear().await
    }
}
