//! Default access provider initialization from the environment.

use crate::config::AccessConfig;
use crate::config_access::register;
use crate::manager::AccessManager;
use crate::registry::AccessRegistry;
use std::sync::Arc;
use tracing::info;

/// Registers the API key provider from environment variables.
///
/// Reads `KEYGATE_API_KEYS` (JSON array of keys) and
/// `KEYGATE_ACCESS_PROVIDER_NAME`. Call again on configuration reload: the
/// provider is replaced, or unregistered if no key remains.
///
/// Returns `Err` on configuration errors, leaving the registry untouched.
pub fn init_from_env(registry: &AccessRegistry) -> anyhow::Result<()> {
    let config = AccessConfig::from_env()?;
    if config.is_none() {
        info!("KEYGATE_API_KEYS not set - API key access disabled");
    }
    register(registry, config.as_ref());
    Ok(())
}

/// Builds an access manager over a fresh registry initialized from the environment.
///
/// # Example
///
/// ```rust,no_run
/// use keygate_auth::default_provider::manager;
///
/// # fn example() -> anyhow::Result<()> {
/// let access = manager()?;
/// if access.registry().is_empty() {
///     println!("No access control configured");
/// }
/// # Ok(())
/// # }
/// ```
pub fn manager() -> anyhow::Result<AccessManager> {
    let registry = Arc::new(AccessRegistry::new());
    init_from_env(&registry)?;
    Ok(AccessManager::new(registry))
}
