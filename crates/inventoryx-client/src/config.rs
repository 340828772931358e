//! Client configuration
//!
//! Config precedence: env vars > config file > defaults. The API base URL is
//! externally configured — it is deployment data, not part of the session
//! core. Refresh calls share the ordinary request timeout: there is no
//! distinct refresh timeout policy, and a timed-out refresh is treated as a
//! refresh failure by the coordinator.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

/// Remote API settings
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Session persistence settings
#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Path of the durable session file (the cookie-equivalent store).
    pub store_path: PathBuf,
}

fn default_timeout() -> u64 {
    30
}

impl ClientConfig {
    /// Load configuration from a TOML file, then overlay environment
    /// variables (`API_BASE_URL`, `SESSION_STORE_PATH`).
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ClientConfig = toml::from_str(&contents)?;

        if let Ok(url) = std::env::var("API_BASE_URL") {
            config.api.base_url = url;
        }
        if let Ok(store_path) = std::env::var("SESSION_STORE_PATH") {
            config.session.store_path = PathBuf::from(store_path);
        }

        if !config.api.base_url.starts_with("http://")
            && !config.api.base_url.starts_with("https://")
        {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                config.api.base_url
            )));
        }

        if config.api.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be greater than 0".into()));
        }

        Ok(config)
    }

    /// Build the shared HTTP client with the configured timeout.
    ///
    /// One client serves ordinary requests, login, and refresh — sharing the
    /// connection pool is safe because interception happens in `ApiClient`,
    /// not inside reqwest.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .build()
            .map_err(|e| Error::Http(format!("building HTTP client: {e}")))
    }
}
