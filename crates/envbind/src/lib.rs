//! Typed environment variable loading.
//!
//! This crate binds environment keys to typed program variables, resolves
//! them from the process environment (or a map, a `.env` file, or a prefixed
//! view of either) in one pass, and reports every missing or malformed
//! variable at once.

mod loader;

pub use loader::{
    DecodeError, EnvSource, LoadError, Loader, MapSource, PrefixSource, Source, SourceError,
};
