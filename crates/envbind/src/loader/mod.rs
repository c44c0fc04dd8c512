//! Typed variable loading from key-value sources.
//!
//! Responsibilities:
//! - Bind keys to typed destinations and resolve them in a single `load` pass.
//! - Abstract the key-value source (process environment, map, dotenv file, prefixed view).
//! - Render help text for registered variables.
//!
//! Does NOT handle:
//! - Structured or nested configuration, schema files, or live reload.
//! - Validation beyond presence and type coercion.
//!
//! Invariants / Assumptions:
//! - Nothing is read from the source until `load()` is called.
//! - Missing keys and malformed values are reported together, never one at a time.

mod binding;
mod builder;
mod error;
mod source;

pub use builder::Loader;
pub use error::{DecodeError, LoadError, SourceError};
pub use source::{EnvSource, MapSource, PrefixSource, Source};

#[cfg(test)]
mod tests;
