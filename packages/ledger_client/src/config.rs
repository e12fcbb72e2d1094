use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_ENDPOINT: &str = "http://localhost:8080/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

// =============================================================================
// Client options (figment-deserialized from defaults / ledger.toml / env vars)
// =============================================================================
//
//   ledger.toml:     base_endpoint = "http://localhost:8080/v1"
//                    timeout_ms = 3000
//
//   env var:         LEDGER_BASE_ENDPOINT=http://ledger.internal/v1
//                    LEDGER_TIMEOUT_MS=5000

/// Connection settings for a [`Client`](crate::Client). Fixed once the client is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// Base address every request path is resolved against, e.g. `http://localhost:8080/v1`.
    #[serde(default = "default_base_endpoint")]
    pub base_endpoint: String,
    /// Whole-request timeout in milliseconds. `0` disables the timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_endpoint: default_base_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_base_endpoint() -> String {
    DEFAULT_BASE_ENDPOINT.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ClientOptions {
    pub fn new(base_endpoint: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            base_endpoint: base_endpoint.into(),
            timeout_ms,
        }
    }

    /// The request timeout, or `None` when `timeout_ms` is zero.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    pub fn from_figment(figment: &figment::Figment) -> Result<Self> {
        figment
            .extract()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))
    }
}

/// Build a figment that layers: defaults → optional TOML file → LEDGER_* env vars.
pub fn load_options(config_file: Option<&Path>) -> figment::Figment {
    use figment::{
        Figment,
        providers::{Env, Format, Serialized, Toml},
    };

    let mut figment = Figment::from(Serialized::defaults(ClientOptions::default()));
    if let Some(path) = config_file {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(Env::prefixed("LEDGER_"))
}
