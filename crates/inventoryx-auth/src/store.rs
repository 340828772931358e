//! Durable session storage
//!
//! Persists the session as a JSON file of `key -> {value, expires}` entries,
//! the cookie-equivalent store of the session contract: each field carries
//! its own absolute expiry, computed at write time from the TTL constants.
//! All writes use atomic temp-file + rename to prevent corruption on crash,
//! and a tokio Mutex serializes concurrent mutation from the login path and
//! request-time refresh.
//!
//! This store is the single source of truth for session data and the only
//! shared mutable resource in the client. It is mutated exclusively by
//! `set_session` (login/refresh success) and `clear` (logout, refresh
//! failure). Reads clone in-memory state and never touch the network; an
//! entry whose expiry has passed reads as absent, so TTL lapse behaves as a
//! silent logout on the next read.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::constants::{
    ACCESS_TOKEN_KEY, ACCESS_TOKEN_TTL, FIRST_NAME_KEY, LAST_NAME_KEY, REFRESH_TOKEN_KEY,
    REFRESH_TOKEN_TTL, ROLES_KEY,
};
use crate::error::{Error, Result};
use crate::navigator::{Navigator, Route};
use crate::session::{AuthResponse, Session};

/// One persisted field.
///
/// `expires` is a unix timestamp in milliseconds (absolute, not a delta),
/// computed at storage time from the field's TTL plus the current time.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredValue {
    value: serde_json::Value,
    expires: u64,
}

/// Durable, expiring session store.
///
/// The Mutex serializes all writes. Reads acquire the lock briefly to
/// assemble a `Session` from the in-memory state, so request-time reads
/// don't block on disk writes beyond the copy.
pub struct CredentialStore {
    path: PathBuf,
    navigator: Arc<dyn Navigator>,
    state: Mutex<HashMap<String, StoredValue>>,
}

impl CredentialStore {
    /// Hydrate the store from the given file path.
    ///
    /// If the file doesn't exist, creates it as `{}` (cold start, anonymous
    /// session). Expired entries are kept on disk and filtered at read time.
    pub async fn load(path: PathBuf, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let state = if path.exists() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| Error::Io(format!("reading session file: {e}")))?;
            let entries: HashMap<String, StoredValue> = serde_json::from_str(&contents)
                .map_err(|e| Error::StoreParse(format!("parsing session file: {e}")))?;
            info!(path = %path.display(), entries = entries.len(), "loaded session storage");
            entries
        } else {
            info!(path = %path.display(), "session file not found, starting anonymous");
            let entries = HashMap::new();
            // Create the empty file so future loads skip the cold-start path
            write_atomic(&path, &entries).await?;
            entries
        };

        Ok(Self {
            path,
            navigator,
            state: Mutex::new(state),
        })
    }

    /// Read the current session. Never fails; absent or expired fields read
    /// as `None` (or an empty role list).
    pub async fn get(&self) -> Session {
        let state = self.state.lock().await;
        let now = now_millis();
        Session {
            access_token: read_string(&state, ACCESS_TOKEN_KEY, now),
            refresh_token: read_string(&state, REFRESH_TOKEN_KEY, now),
            roles: read_roles(&state, now),
            first_name: read_string(&state, FIRST_NAME_KEY, now),
            last_name: read_string(&state, LAST_NAME_KEY, now),
        }
    }

    /// Overwrite every session field atomically from an identity endpoint
    /// payload: one lock acquisition, one disk write. Used only by the
    /// login and refresh success paths.
    pub async fn set_session(&self, auth: &AuthResponse) -> Result<()> {
        let now = now_millis();
        let access_expiry = now + ACCESS_TOKEN_TTL.as_millis() as u64;
        let long_expiry = now + REFRESH_TOKEN_TTL.as_millis() as u64;

        let mut state = self.state.lock().await;
        state.insert(
            ACCESS_TOKEN_KEY.into(),
            StoredValue {
                value: auth.access_token.clone().into(),
                expires: access_expiry,
            },
        );
        state.insert(
            REFRESH_TOKEN_KEY.into(),
            StoredValue {
                value: auth.refresh_token.clone().into(),
                expires: long_expiry,
            },
        );
        state.insert(
            ROLES_KEY.into(),
            StoredValue {
                value: auth.roles.clone().into(),
                expires: long_expiry,
            },
        );
        state.insert(
            FIRST_NAME_KEY.into(),
            StoredValue {
                value: auth.first_name.clone().into(),
                expires: long_expiry,
            },
        );
        state.insert(
            LAST_NAME_KEY.into(),
            StoredValue {
                value: auth.last_name.clone().into(),
                expires: long_expiry,
            },
        );
        debug!(username = %auth.username, "session stored");
        write_atomic(&self.path, &state).await
    }

    /// Reset every field to absent and route the user to the login entry
    /// point. Idempotent with respect to state; the navigation request fires
    /// on every call and the navigator decides what to do with it.
    pub async fn clear(&self) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            if !state.is_empty() {
                state.clear();
                write_atomic(&self.path, &state).await?;
                info!("session cleared");
            }
        }
        self.navigator.navigate(Route::Login);
        Ok(())
    }

    /// Exact membership test against the stored role list.
    pub async fn has_role(&self, role: &str) -> bool {
        self.get().await.has_role(role)
    }

    /// Whether an unexpired access token is present.
    pub async fn is_authenticated(&self) -> bool {
        self.get().await.is_authenticated()
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn read_string(state: &HashMap<String, StoredValue>, key: &str, now: u64) -> Option<String> {
    state
        .get(key)
        .filter(|entry| entry.expires > now)
        .and_then(|entry| entry.value.as_str())
        .map(str::to_owned)
}

fn read_roles(state: &HashMap<String, StoredValue>, now: u64) -> Vec<String> {
    state
        .get(ROLES_KEY)
        .filter(|entry| entry.expires > now)
        .and_then(|entry| entry.value.as_array())
        .map(|roles| {
            roles
                .iter()
                .filter_map(|role| role.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

/// Write the session file atomically.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target. Sets file permissions to 0600 (owner read/write only) since
/// the file contains bearer tokens.
async fn write_atomic(path: &Path, entries: &HashMap<String, StoredValue>) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)
        .map_err(|e| Error::StoreParse(format!("serializing session: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io("session path has no parent directory".into()))?;

    let tmp_path = dir.join(format!(".session.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp session file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting session file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp session file: {e}")))?;

    debug!(path = %path.display(), "persisted session");
    Ok(())
}
