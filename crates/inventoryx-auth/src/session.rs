//! Session data model
//!
//! `AuthResponse` is the wire payload returned by both `/auth/login` and
//! `/auth/refresh` (camelCase field names on the wire). `Session` is the
//! client-side view assembled from the credential store: every field is
//! independently absent once its storage TTL lapses, and access token
//! presence is the sole definition of "authenticated".

use serde::{Deserialize, Serialize};

use crate::secret::Secret;

/// Login request payload for `/auth/login`.
///
/// The password is wrapped so the command can travel through logging and
/// error paths without leaking it.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: Secret,
}

impl LoginCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password),
        }
    }
}

/// Identity endpoint response for both login and refresh.
///
/// `permissions` is carried on the wire but not persisted; coarse-grained
/// authorization on the client uses `roles` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// The current session as read from the credential store.
///
/// Absent fields read as `None`; an expired field is indistinguishable from
/// one that was never set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub roles: Vec<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Session {
    /// Access token presence is the sole definition of "authenticated".
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Exact membership test against the role list.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
