//! Registry of access providers keyed by provider type.

use crate::types::AccessProvider;
use std::sync::{Arc, PoisonError, RwLock};

/// Registered providers, keyed by provider type.
///
/// Registration order is preserved and decides authentication precedence.
/// Registering an already known type replaces the provider in place, so a
/// reload does not change precedence. Callers holding a snapshot from
/// [`AccessRegistry::providers`] keep using the providers they got.
#[derive(Default)]
pub struct AccessRegistry {
    entries: RwLock<Vec<(String, Arc<dyn AccessProvider>)>>,
}

impl AccessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` under `provider_type`, last write wins.
    pub fn register(&self, provider_type: &str, provider: Arc<dyn AccessProvider>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.iter_mut().find(|(t, _)| t == provider_type) {
            entry.1 = provider;
        } else {
            entries.push((provider_type.to_string(), provider));
        }
    }

    /// Removes the provider registered under `provider_type`, if any.
    ///
    /// Returns true if a provider was removed.
    pub fn unregister(&self, provider_type: &str) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(t, _)| t != provider_type);
        entries.len() != before
    }

    pub fn get(&self, provider_type: &str) -> Option<Arc<dyn AccessProvider>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .find(|(t, _)| t == provider_type)
            .map(|(_, p)| p.clone())
    }

    /// Snapshot of the registered providers in precedence order.
    pub fn providers(&self) -> Vec<Arc<dyn AccessProvider>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn provider_types(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
