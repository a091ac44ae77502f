//! Normalized sets of pre-shared API keys.

use std::collections::HashSet;
use std::fmt;

/// Trims, drops empty entries and deduplicates raw configured keys.
///
/// The first occurrence of a key decides its position in the output.
pub fn normalize_keys<I, S>(raw_keys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();
    for raw in raw_keys {
        let key = raw.as_ref().trim();
        if key.is_empty() || !seen.insert(key.to_string()) {
            continue;
        }
        normalized.push(key.to_string());
    }
    normalized
}

/// Immutable set of valid API keys.
///
/// A `KeySet` always holds at least one key; members are trimmed and unique.
#[derive(Clone, PartialEq, Eq)]
pub struct KeySet {
    keys: HashSet<String>,
}

impl KeySet {
    /// Builds a key set from raw configured values.
    ///
    /// Returns `None` when no usable key remains after normalization, in which
    /// case no provider should be active.
    pub fn from_raw<I, S>(raw_keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: HashSet<String> = normalize_keys(raw_keys).into_iter().collect();
        if keys.is_empty() {
            None
        } else {
            Some(Self { keys })
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.keys.contains(token)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeySet(<{} sensitive keys>)", self.keys.len())
    }
}
