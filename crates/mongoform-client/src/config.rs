//! Client configuration.
//!
//! Values resolve in order: explicit builder calls, then environment
//! variables, then defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::{EnvReader, RealEnv};
use crate::error::{ClientError, Result};

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URI: &str = "http://localhost:8080/mongo-api";

/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the base URI.
pub const BASE_URI_VAR: &str = "MONGOFORM_BASE_URI";

/// Environment variable overriding the timeout, in whole seconds.
pub const TIMEOUT_VAR: &str = "MONGOFORM_TIMEOUT_SECS";

/// Where and how the client reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root that every operation path is appended to.
    pub base_uri: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_reader(&RealEnv)
    }

    /// Defaults overlaid with variables from `env`.
    pub fn from_reader(env: &dyn EnvReader) -> Result<Self> {
        let mut config = Self::default();

        if let Some(uri) = env.var(BASE_URI_VAR) {
            config.base_uri = uri;
        }
        if let Some(raw) = env.var(TIMEOUT_VAR) {
            config.timeout_secs = raw.trim().parse().map_err(|_| {
                ClientError::InvalidConfig(format!("{TIMEOUT_VAR} must be whole seconds, got '{raw}'"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URI without trailing slashes.
    pub fn root(&self) -> &str {
        self.base_uri.trim_end_matches('/')
    }

    /// Rejects a blank base URI or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.root().trim().is_empty() {
            return Err(ClientError::InvalidConfig("base URI is empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig("timeout must be positive".into()));
        }
        Ok(())
    }
}
