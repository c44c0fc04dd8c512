//! Error types for loading typed variables.
//!
//! Responsibilities:
//! - Define decode errors for malformed values of present keys.
//! - Define the aggregate `LoadError` returned by `Loader::load`.
//! - Define source construction errors (dotenv files).
//!
//! Does NOT handle:
//! - Deciding which bindings are missing or malformed (see builder.rs).
//!
//! Invariants:
//! - Every error names the effective (fully prefixed) key.
//! - With only missing keys, `LoadError` renders exactly as
//!   `missing environment variables: K1, K2`.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::io::ErrorKind;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// A present key whose value could not be decoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("{key} (invalid integer {value:?}: {source})")]
    InvalidInt {
        key: String,
        value: String,
        source: ParseIntError,
    },

    #[error("{key} (invalid float {value:?}: {source})")]
    InvalidFloat {
        key: String,
        value: String,
        source: ParseFloatError,
    },

    #[error("{key} (invalid boolean {value:?})")]
    InvalidBool { key: String, value: String },
}

impl DecodeError {
    /// The effective key of the offending variable.
    pub fn key(&self) -> &str {
        match self {
            DecodeError::InvalidInt { key, .. }
            | DecodeError::InvalidFloat { key, .. }
            | DecodeError::InvalidBool { key, .. } => key,
        }
    }
}

/// Everything that went wrong during one `Loader::load` call.
///
/// Both lists are in registration order.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", render(.missing, .invalid))]
pub struct LoadError {
    missing: Vec<String>,
    invalid: Vec<DecodeError>,
}

impl LoadError {
    pub(crate) fn new(missing: Vec<String>, invalid: Vec<DecodeError>) -> Self {
        Self { missing, invalid }
    }

    /// Effective keys of required variables that were absent.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Present variables whose values failed to decode.
    pub fn invalid(&self) -> &[DecodeError] {
        &self.invalid
    }
}

fn render(missing: &[String], invalid: &[DecodeError]) -> String {
    let mut parts = Vec::with_capacity(2);
    if !missing.is_empty() {
        parts.push(format!("missing environment variables: {}", missing.join(", ")));
    }
    if !invalid.is_empty() {
        let invalid: Vec<String> = invalid.iter().map(ToString::to_string).collect();
        parts.push(format!("invalid environment variables: {}", invalid.join(", ")));
    }
    parts.join("; ")
}

/// Errors that can occur while building a source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error("Failed to parse .env file at position {error_index}")]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    ///
    /// SAFETY: This error does not include any raw dotenv content.
    #[error("Failed to load .env file")]
    DotenvUnknown,
}

impl SourceError {
    pub(crate) fn from_dotenv(error: dotenvy::Error) -> Self {
        match error {
            dotenvy::Error::LineParse(_, idx) => SourceError::DotenvParse { error_index: idx },
            dotenvy::Error::Io(io_err) => SourceError::DotenvIo {
                kind: io_err.kind(),
            },
            _ => SourceError::DotenvUnknown,
        }
    }
}
