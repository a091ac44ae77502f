//! Provider validating requests against API keys listed in the configuration.

use crate::config::AccessConfig;
use crate::credentials::collect_candidates;
use crate::keyset::KeySet;
use crate::registry::AccessRegistry;
use crate::types::{AccessProvider, AuthError, AuthResult, METADATA_SOURCE, RequestParts};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Provider type under which configured API keys are registered
pub const PROVIDER_TYPE_CONFIG_API_KEY: &str = "config-api-key";

/// Identifier used when no provider name is configured
pub const DEFAULT_PROVIDER_NAME: &str = "config-inline";

/// API key provider backed by an immutable [`KeySet`]
pub struct ConfigApiKeyProvider {
    name: String,
    keys: KeySet,
}

impl ConfigApiKeyProvider {
    /// Creates a provider; a blank `name` falls back to [`DEFAULT_PROVIDER_NAME`].
    pub fn new(name: &str, keys: KeySet) -> Self {
        let name = match name.trim() {
            "" => DEFAULT_PROVIDER_NAME,
            trimmed => trimmed,
        };
        Self {
            name: name.to_string(),
            keys,
        }
    }

    pub fn keys(&self) -> &KeySet {
        &self.keys
    }
}

#[async_trait::async_trait]
impl AccessProvider for ConfigApiKeyProvider {
    fn identifier(&self) -> &str {
        &self.name
    }

    async fn authenticate(&self, parts: &dyn RequestParts) -> Result<AuthResult, AuthError> {
        if self.keys.is_empty() {
            return Err(AuthError::NotHandled);
        }
        let candidates = collect_candidates(parts)?;
        let Some(matched) = candidates.into_iter().find(|c| self.keys.contains(&c.token)) else {
            debug!("no API key candidate matched for provider {}", self.name);
            return Err(AuthError::InvalidCredential);
        };
        let mut metadata = HashMap::new();
        metadata.insert(METADATA_SOURCE.to_string(), matched.source.to_string());
        Ok(AuthResult {
            provider: self.name.clone(),
            principal: matched.token,
            metadata,
        })
    }
}

/// Registers the configured API key provider, or removes it.
///
/// The provider is unregistered when there is no configuration or when no
/// usable key remains after normalization. Otherwise any previous provider of
/// the same type is replaced.
pub fn register(registry: &AccessRegistry, config: Option<&AccessConfig>) {
    let keys = config.and_then(|config| KeySet::from_raw(&config.api_keys));
    let (Some(config), Some(keys)) = (config, keys) else {
        if registry.unregister(PROVIDER_TYPE_CONFIG_API_KEY) {
            info!("no API keys configured, {PROVIDER_TYPE_CONFIG_API_KEY} provider unregistered");
        }
        return;
    };
    let provider = ConfigApiKeyProvider::new(config.name.as_deref().unwrap_or_default(), keys);
    info!(
        "registering {PROVIDER_TYPE_CONFIG_API_KEY} provider name={} keys={}",
        provider.identifier(),
        provider.keys().len()
    );
    registry.register(PROVIDER_TYPE_CONFIG_API_KEY, Arc::new(provider));
}
