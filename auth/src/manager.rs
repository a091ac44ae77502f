//! Authentication across every registered access provider.

use crate::registry::AccessRegistry;
use crate::types::{AuthError, AuthResult, RequestParts};
use std::sync::Arc;
use tracing::debug;

/// Runs the providers of a registry in precedence order until one accepts.
///
/// `NotHandled` outcomes fall through silently. When every provider refuses,
/// `InvalidCredential` wins over `NoCredentials` so that a client presenting a
/// wrong key is told so even if another provider saw nothing it recognized.
///
/// # Example
///
/// ```rust
/// use keygate_auth::config::AccessConfig;
/// use keygate_auth::config_access::register;
/// use keygate_auth::manager::AccessManager;
/// use keygate_auth::registry::AccessRegistry;
/// use keygate_auth::types::HttpRequestParts;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let registry = Arc::new(AccessRegistry::new());
/// register(&registry, Some(&AccessConfig::new(vec!["secret".to_string()])));
/// let manager = AccessManager::new(registry);
///
/// let parts = HttpRequestParts {
///     headers: http::HeaderMap::new(),
///     method: http::Method::GET,
///     uri: "/v1/models?key=secret".parse()?,
/// };
/// let result = manager.authenticate(&parts).await?;
/// assert_eq!(result.map(|r| r.principal), Some("secret".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AccessManager {
    registry: Arc<AccessRegistry>,
}

impl AccessManager {
    pub fn new(registry: Arc<AccessRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<AccessRegistry> {
        &self.registry
    }

    /// Authenticates a request.
    ///
    /// Returns `Ok(None)` when no provider is registered, meaning access
    /// control is disabled.
    pub async fn authenticate(
        &self,
        parts: &dyn RequestParts,
    ) -> Result<Option<AuthResult>, AuthError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Ok(None);
        }

        let mut missing = false;
        let mut invalid = false;
        for provider in providers {
            match provider.authenticate(parts).await {
                Ok(result) => return Ok(Some(result)),
                Err(AuthError::NotHandled) => {
                    debug!("provider {} did not handle request", provider.identifier());
                }
                Err(AuthError::NoCredentials) => missing = true,
                Err(AuthError::InvalidCredential) => invalid = true,
            }
        }

        if invalid {
            Err(AuthError::InvalidCredential)
        } else {
            debug!("no provider accepted request, missing credentials={missing}");
            Err(AuthError::NoCredentials)
        }
    }
}
