//! Key-value sources backing a `Loader`.
//!
//! Responsibilities:
//! - Define the `Source` lookup contract (value + presence).
//! - Provide the process-environment, in-memory map and prefixing sources.
//! - Read `.env` files into an in-memory map without touching the process environment.
//!
//! Does NOT handle:
//! - Decoding values into typed destinations (see binding.rs).
//! - Aggregating missing keys (see builder.rs).
//!
//! Invariants:
//! - `EnvSource` reads the live environment on every lookup; nothing is snapshotted.
//! - `PrefixSource::lookup(key)` and `PrefixSource::effective_key(key)` walk the
//!   decorator chain identically, so errors and help always name the key actually read.
//! - Dotenv errors NEVER include raw `.env` line contents to prevent secret leakage.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::error::SourceError;

/// A pluggable key-value lookup.
pub trait Source: fmt::Debug + Send + Sync {
    /// Look up `key`, returning `None` when it is absent.
    fn lookup(&self, key: &str) -> Option<String>;

    /// The key as it is really looked up by this source.
    fn effective_key(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl Source for EnvSource {
    fn lookup(&self, key: &str) -> Option<String> {
        let raw = std::env::var_os(key)?;
        match raw.into_string() {
            Ok(value) => Some(value),
            Err(raw) => {
                tracing::warn!(key, "environment variable is not valid UTF-8, converting lossily");
                Some(raw.to_string_lossy().into_owned())
            }
        }
    }
}

/// Fixed in-memory mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Read a `.env` file into a map source.
    ///
    /// The process environment is left untouched; variable substitution follows
    /// `dotenvy`'s rules against the current environment.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let iter = dotenvy::from_path_iter(path).map_err(SourceError::from_dotenv)?;
        let mut values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(SourceError::from_dotenv)?;
            values.insert(key, value);
        }
        tracing::debug!(path = %path.display(), count = values.len(), "loaded dotenv file");
        Ok(Self { values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MapSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Source for MapSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Decorator that prepends a prefix to every key before delegating.
#[derive(Debug, Clone)]
pub struct PrefixSource {
    inner: Arc<dyn Source>,
    prefix: String,
}

impl PrefixSource {
    pub fn new(inner: Arc<dyn Source>, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    /// This decorator's own prefix segment (not the composed one).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn prefixed(&self, key: &str) -> String {
        let mut full = String::with_capacity(self.prefix.len() + key.len());
        full.push_str(&self.prefix);
        full.push_str(key);
        full
    }
}

impl Source for PrefixSource {
    fn lookup(&self, key: &str) -> Option<String> {
        self.inner.lookup(&self.prefixed(key))
    }

    fn effective_key(&self, key: &str) -> String {
        self.inner.effective_key(&self.prefixed(key))
    }
}
