//! Client configuration
//!
//! A `ClientConfig` is either built in code (`ClientConfig::new` plus the
//! `with_*` setters) or loaded from a TOML file. When loading, the app secret
//! is resolved in this order:
//! 1. ACCOUNTKIT_APP_SECRET env var
//! 2. app_secret_file path from config
//! 3. inline app_secret (discouraged; keeps the secret in the file)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::constants::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use crate::secret::SecretString;

/// Env var that overrides the app secret from the config file
pub const APP_SECRET_ENV: &str = "ACCOUNTKIT_APP_SECRET";

/// Env var naming the config file when no explicit path is given
pub const CONFIG_PATH_ENV: &str = "ACCOUNTKIT_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "accountkit.toml";

/// Application identity and transport settings for one client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub app_id: String,
    #[serde(default)]
    pub app_secret: SecretString,
    /// Path to a file containing the app secret (alternative to the env var)
    #[serde(default)]
    pub app_secret_file: Option<PathBuf>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Record request/response detail through the client's debug sink
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole request timeout; `timeout_secs` in TOML
    #[serde(
        rename = "timeout_secs",
        default = "default_timeout",
        deserialize_with = "deserialize_secs"
    )]
    pub timeout: Duration,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn deserialize_secs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl ClientConfig {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<SecretString>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            app_secret_file: None,
            api_version: default_api_version(),
            debug: false,
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Load configuration from a TOML file, then overlay the secret sources.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ClientConfig = toml::from_str(&contents)?;

        config.validate()?;

        if let Ok(secret) = std::env::var(APP_SECRET_ENV) {
            config.app_secret = SecretString::new(secret);
        } else if let Some(ref secret_file) = config.app_secret_file {
            let secret = std::fs::read_to_string(secret_file).map_err(|e| {
                Error::Config(format!(
                    "failed to read app_secret_file {}: {e}",
                    secret_file.display()
                ))
            })?;
            let secret = secret.trim();
            if !secret.is_empty() {
                config.app_secret = SecretString::new(secret);
            }
        }

        if config.app_secret.is_empty() {
            return Err(Error::Config(format!(
                "no app secret: set {APP_SECRET_ENV}, app_secret_file or app_secret"
            )));
        }

        debug!(
            path = %path.display(),
            app_id = %config.app_id,
            api_version = %config.api_version,
            base_url = %config.base_url,
            "loaded accountkit config"
        );
        Ok(config)
    }

    /// Resolve config file path from an explicit path or ACCOUNTKIT_CONFIG.
    pub fn resolve_path(explicit: Option<&str>) -> PathBuf {
        if let Some(p) = explicit {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Reject settings no request could succeed with.
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than 0".into()));
        }
        Ok(())
    }
}
