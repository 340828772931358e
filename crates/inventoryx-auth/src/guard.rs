//! Route-level session guard
//!
//! Runs before navigation, independently of the request path: a pure read of
//! the credential store plus a routing decision. No network calls — an
//! expired access token simply reads as absent and resolves to the login
//! redirect.

use std::sync::Arc;

use tracing::debug;

use crate::store::CredentialStore;

/// Outcome of a guard check. The embedding router executes the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Proceed to the requested route.
    Allow,
    /// Not authenticated: go to the login entry point.
    RedirectLogin,
    /// Authenticated but missing the required role: go to the default
    /// authenticated landing page.
    RedirectHome,
}

/// Gate for navigation targets with an optional declared role requirement.
pub struct SessionGuard {
    store: Arc<CredentialStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    /// Check a navigation target. `required_role: None` means any
    /// authenticated user may proceed.
    pub async fn check(&self, required_role: Option<&str>) -> GuardDecision {
        let session = self.store.get().await;

        if !session.is_authenticated() {
            debug!("guard: unauthenticated, redirecting to login");
            return GuardDecision::RedirectLogin;
        }

        if let Some(role) = required_role {
            if !session.has_role(role) {
                debug!(role, "guard: missing required role, redirecting home");
                return GuardDecision::RedirectHome;
            }
        }

        GuardDecision::Allow
    }
}
