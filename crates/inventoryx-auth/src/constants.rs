//! Storage keys, TTLs, and identity endpoint paths
//!
//! The keys and TTLs are the cookie-equivalent contract of the session store:
//! each field persists under its own key with its own expiry. The access token
//! deliberately expires before the refresh token so that a reloaded client can
//! still recover a session via refresh after the access token has lapsed.

use std::time::Duration;

/// Storage key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "auth_token";

/// Storage key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Storage key for the role list.
pub const ROLES_KEY: &str = "auth_roles";

/// Storage keys for the display-only profile fields, persisted so they
/// survive a reload without requiring a profile endpoint.
pub const FIRST_NAME_KEY: &str = "auth_firstName";
pub const LAST_NAME_KEY: &str = "auth_lastName";

/// Access token lifetime (1 day).
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Refresh token lifetime (7 days). Also used for roles and profile fields.
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Identity endpoint paths, relative to the configured API base URL.
pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_match_persisted_contract() {
        assert_eq!(ACCESS_TOKEN_KEY, "auth_token");
        assert_eq!(REFRESH_TOKEN_KEY, "refresh_token");
        assert_eq!(ROLES_KEY, "auth_roles");
        assert_eq!(FIRST_NAME_KEY, "auth_firstName");
        assert_eq!(LAST_NAME_KEY, "auth_lastName");
    }

    #[test]
    fn access_token_expires_before_refresh_token() {
        assert!(ACCESS_TOKEN_TTL < REFRESH_TOKEN_TTL);
        assert_eq!(ACCESS_TOKEN_TTL.as_secs(), 86_400);
        assert_eq!(REFRESH_TOKEN_TTL.as_secs(), 7 * 86_400);
    }
}
