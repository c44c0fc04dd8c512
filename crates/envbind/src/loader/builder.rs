//! The `Loader`: register typed bindings, then resolve them in one pass.
//!
//! Responsibilities:
//! - Construct loaders over the process environment, a map, a dotenv file or any `Source`.
//! - Derive prefixed loaders that share the parent's source.
//! - Queue typed bindings and resolve them in `load`, aggregating every failure.
//! - Render help text for every registered binding.
//!
//! Does NOT handle:
//! - Decode rules for individual types (see binding.rs).
//! - Key lookup details (see source.rs).
//!
//! Invariants / Assumptions:
//! - Registration never touches the source and cannot fail.
//! - Bindings are resolved and reported in registration order.
//! - `prefix()` never mutates the parent; the derived loader starts with no bindings.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use super::binding::{Binding, BindingKind, Resolution};
use super::error::{LoadError, SourceError};
use super::source::{EnvSource, MapSource, PrefixSource, Source};

/// Typed variable loader bound to a key-value source.
///
/// ```
/// use envbind::Loader;
///
/// let mut host = String::new();
/// let mut port = 0;
/// let mut loader = Loader::from_map([("HOST", "localhost")]);
/// loader
///     .string("HOST", Some(&mut host), "hostname")
///     .optional_int("PORT", Some(&mut port), 8080, "port number");
/// assert_eq!(loader.help(), "HOST -- hostname\nPORT -- port number\n");
/// loader.load().unwrap();
/// drop(loader);
/// assert_eq!((host.as_str(), port), ("localhost", 8080));
/// ```
#[derive(Debug)]
pub struct Loader<'a> {
    source: Arc<dyn Source>,
    bindings: Vec<Binding<'a>>,
}

impl Default for Loader<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Loader<'a> {
    /// Create a loader over the live process environment.
    pub fn new() -> Self {
        Self::with_source(EnvSource)
    }

    /// Create a loader over a fixed in-memory mapping.
    pub fn from_map<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_source(values.into_iter().collect::<MapSource>())
    }

    /// Create a loader over the contents of a `.env` file.
    ///
    /// The process environment is not modified.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Ok(Self::with_source(MapSource::from_dotenv(path)?))
    }

    /// Create a loader over any source.
    pub fn with_source(source: impl Source + 'static) -> Self {
        Self::from_shared(Arc::new(source))
    }

    fn from_shared(source: Arc<dyn Source>) -> Self {
        Self {
            source,
            bindings: Vec::new(),
        }
    }

    /// Derive a loader that looks up every key under `prefix`.
    ///
    /// Prefixes compose: `prefix("A_").prefix("B_")` reads `A_B_<key>`.
    pub fn prefix<'b>(&self, prefix: impl Into<String>) -> Loader<'b> {
        Loader::from_shared(Arc::new(PrefixSource::new(
            Arc::clone(&self.source),
            prefix,
        )))
    }

    /// The key as it is looked up, reported and shown in help.
    pub fn effective_key(&self, key: &str) -> String {
        self.source.effective_key(key)
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn register(&mut self, key: &str, description: &str, kind: BindingKind<'a>) -> &mut Self {
        self.bindings.push(Binding {
            key: key.to_string(),
            description: description.to_string(),
            kind,
        });
        self
    }

    /// Required string, copied verbatim.
    pub fn string(
        &mut self,
        key: &str,
        dest: Option<&'a mut String>,
        description: &str,
    ) -> &mut Self {
        self.register(key, description, BindingKind::String { dest, default: None })
    }

    pub fn optional_string(
        &mut self,
        key: &str,
        dest: Option<&'a mut String>,
        default: impl Into<String>,
        description: &str,
    ) -> &mut Self {
        let default = Some(default.into());
        self.register(key, description, BindingKind::String { dest, default })
    }

    /// Required base-10 signed integer.
    pub fn int(&mut self, key: &str, dest: Option<&'a mut i64>, description: &str) -> &mut Self {
        self.register(key, description, BindingKind::Int { dest, default: None })
    }

    pub fn optional_int(
        &mut self,
        key: &str,
        dest: Option<&'a mut i64>,
        default: i64,
        description: &str,
    ) -> &mut Self {
        let default = Some(default);
        self.register(key, description, BindingKind::Int { dest, default })
    }

    /// Required decimal floating-point number.
    pub fn float(&mut self, key: &str, dest: Option<&'a mut f64>, description: &str) -> &mut Self {
        self.register(key, description, BindingKind::Float { dest, default: None })
    }

    pub fn optional_float(
        &mut self,
        key: &str,
        dest: Option<&'a mut f64>,
        default: f64,
        description: &str,
    ) -> &mut Self {
        let default = Some(default);
        self.register(key, description, BindingKind::Float { dest, default })
    }

    /// Required boolean (`1`/`0`, `t`/`f`, `true`/`false` in the usual casings).
    pub fn bool(&mut self, key: &str, dest: Option<&'a mut bool>, description: &str) -> &mut Self {
        self.register(key, description, BindingKind::Bool { dest, default: None })
    }

    pub fn optional_bool(
        &mut self,
        key: &str,
        dest: Option<&'a mut bool>,
        default: bool,
        description: &str,
    ) -> &mut Self {
        let default = Some(default);
        self.register(key, description, BindingKind::Bool { dest, default })
    }

    /// Presence flag: `true` if the key is set to anything, including an empty string.
    pub fn flag(&mut self, key: &str, dest: Option<&'a mut bool>, description: &str) -> &mut Self {
        self.register(key, description, BindingKind::Flag { dest })
    }

    /// Required delimited list; order and duplicates are preserved.
    pub fn list(
        &mut self,
        key: &str,
        dest: Option<&'a mut Vec<String>>,
        delimiter: &str,
        description: &str,
    ) -> &mut Self {
        let delimiter = delimiter.to_string();
        self.register(
            key,
            description,
            BindingKind::List {
                dest,
                delimiter,
                default: None,
            },
        )
    }

    pub fn optional_list(
        &mut self,
        key: &str,
        dest: Option<&'a mut Vec<String>>,
        delimiter: &str,
        default: Vec<String>,
        description: &str,
    ) -> &mut Self {
        let delimiter = delimiter.to_string();
        let default = Some(default);
        self.register(
            key,
            description,
            BindingKind::List {
                dest,
                delimiter,
                default,
            },
        )
    }

    /// Required delimited set; duplicates collapse.
    pub fn set(
        &mut self,
        key: &str,
        dest: Option<&'a mut HashSet<String>>,
        delimiter: &str,
        description: &str,
    ) -> &mut Self {
        let delimiter = delimiter.to_string();
        self.register(
            key,
            description,
            BindingKind::Set {
                dest,
                delimiter,
                default: None,
            },
        )
    }

    pub fn optional_set(
        &mut self,
        key: &str,
        dest: Option<&'a mut HashSet<String>>,
        delimiter: &str,
        default: HashSet<String>,
        description: &str,
    ) -> &mut Self {
        let delimiter = delimiter.to_string();
        let default = Some(default);
        self.register(
            key,
            description,
            BindingKind::Set {
                dest,
                delimiter,
                default,
            },
        )
    }

    /// Resolve every binding against the source.
    ///
    /// All bindings are visited before returning. Missing required keys and
    /// malformed values are collected into one `LoadError`.
    pub fn load(&mut self) -> Result<(), LoadError> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        for binding in &mut self.bindings {
            let effective_key = self.source.effective_key(&binding.key);
            let value = self.source.lookup(&binding.key);
            match binding.resolve(value, &effective_key) {
                Ok(Resolution::Found) => {
                    tracing::debug!(key = %effective_key, "resolved variable");
                }
                Ok(Resolution::Defaulted) => {
                    tracing::debug!(key = %effective_key, "variable not set, using default");
                }
                Ok(Resolution::Missing) => {
                    tracing::debug!(key = %effective_key, "required variable not set");
                    missing.push(effective_key);
                }
                Err(e) => {
                    // The error carries the raw value; keep it out of logs.
                    tracing::debug!(key = %effective_key, "variable failed to decode");
                    invalid.push(e);
                }
            }
        }

        if missing.is_empty() && invalid.is_empty() {
            return Ok(());
        }
        Err(LoadError::new(missing, invalid))
    }

    /// One `<effective-key> -- <description>` line per binding, in registration order.
    pub fn help(&self) -> String {
        let mut out = String::new();
        for binding in &self.bindings {
            let _ = writeln!(
                out,
                "{} -- {}",
                self.source.effective_key(&binding.key),
                binding.description
            );
        }
        out
    }

    /// Keys of the required bindings, in registration order.
    pub fn required_keys(&self) -> Vec<String> {
        self.bindings
            .iter()
            .filter(|b| b.kind.is_required())
            .map(|b| self.source.effective_key(&b.key))
            .collect()
    }
}
