use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable holding a JSON array of API keys
pub const API_KEYS_ENV_VAR: &str = "KEYGATE_API_KEYS";

/// Environment variable holding the access provider display name
pub const PROVIDER_NAME_ENV_VAR: &str = "KEYGATE_ACCESS_PROVIDER_NAME";

/// Access control configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Raw API keys; normalized when the provider is registered
    #[serde(rename = "api-keys", alias = "api_keys")]
    pub api_keys: Vec<String>,
    /// Provider display name, defaults to `config-inline` when blank
    pub name: Option<String>,
}

impl AccessConfig {
    pub fn new(api_keys: Vec<String>) -> Self {
        Self {
            api_keys,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Load access configuration from environment variables.
    ///
    /// Returns `Ok(None)` when `KEYGATE_API_KEYS` is not set.
    pub fn from_env() -> Result<Option<Self>> {
        let Ok(keys_json) = std::env::var(API_KEYS_ENV_VAR) else {
            return Ok(None);
        };
        let api_keys = parse_api_keys(&keys_json)
            .with_context(|| format!("parsing {API_KEYS_ENV_VAR}"))?;
        Ok(Some(Self {
            api_keys,
            name: std::env::var(PROVIDER_NAME_ENV_VAR).ok(),
        }))
    }
}

/// Parses a JSON array of API key strings.
pub fn parse_api_keys(json: &str) -> Result<Vec<String>> {
    let keys: Vec<String> = serde_json::from_str(json)?;
    Ok(keys)
}
