//! Registered variable bindings and their decode rules.
//!
//! Responsibilities:
//! - Hold one registered variable: key, description and a typed `BindingKind`.
//! - Decode raw string values and assign them into destinations.
//! - Assign defaults verbatim when an optional key is absent.
//!
//! Does NOT handle:
//! - Source lookups or error aggregation (see builder.rs).
//!
//! Invariants:
//! - Defaults are never decoded; they are cloned into the destination as given.
//! - A failed decode leaves the destination untouched.
//! - A binding without a destination still decodes, so malformed values are reported.

use std::collections::HashSet;

use super::error::DecodeError;

/// What happened to one binding during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    Found,
    Defaulted,
    Missing,
}

/// One registered variable awaiting resolution.
#[derive(Debug)]
pub(crate) struct Binding<'a> {
    pub(crate) key: String,
    pub(crate) description: String,
    pub(crate) kind: BindingKind<'a>,
}

/// Typed payload of a binding: destination, optional default, decode extras.
#[derive(Debug)]
pub(crate) enum BindingKind<'a> {
    String {
        dest: Option<&'a mut String>,
        default: Option<String>,
    },
    Int {
        dest: Option<&'a mut i64>,
        default: Option<i64>,
    },
    Float {
        dest: Option<&'a mut f64>,
        default: Option<f64>,
    },
    Bool {
        dest: Option<&'a mut bool>,
        default: Option<bool>,
    },
    Flag {
        dest: Option<&'a mut bool>,
    },
    List {
        dest: Option<&'a mut Vec<String>>,
        delimiter: String,
        default: Option<Vec<String>>,
    },
    Set {
        dest: Option<&'a mut HashSet<String>>,
        delimiter: String,
        default: Option<HashSet<String>>,
    },
}

impl Binding<'_> {
    /// Resolve this binding against a looked-up value.
    ///
    /// `effective_key` is only used to label decode errors.
    pub(crate) fn resolve(
        &mut self,
        value: Option<String>,
        effective_key: &str,
    ) -> Result<Resolution, DecodeError> {
        match value {
            Some(raw) => {
                self.kind.decode(raw, effective_key)?;
                Ok(Resolution::Found)
            }
            None => Ok(self.kind.absent()),
        }
    }
}

impl BindingKind<'_> {
    fn absent(&mut self) -> Resolution {
        match self {
            BindingKind::String { dest, default } => fill(dest, default),
            BindingKind::Int { dest, default } => fill(dest, default),
            BindingKind::Float { dest, default } => fill(dest, default),
            BindingKind::Bool { dest, default } => fill(dest, default),
            BindingKind::List { dest, default, .. } => fill(dest, default),
            BindingKind::Set { dest, default, .. } => fill(dest, default),
            BindingKind::Flag { dest } => {
                assign(dest, false);
                Resolution::Defaulted
            }
        }
    }

    fn decode(&mut self, raw: String, key: &str) -> Result<(), DecodeError> {
        match self {
            BindingKind::String { dest, .. } => assign(dest, raw),
            BindingKind::Int { dest, .. } => {
                let value = raw.parse::<i64>().map_err(|source| DecodeError::InvalidInt {
                    key: key.to_string(),
                    value: raw.clone(),
                    source,
                })?;
                assign(dest, value);
            }
            BindingKind::Float { dest, .. } => {
                let value = raw.parse::<f64>().map_err(|source| DecodeError::InvalidFloat {
                    key: key.to_string(),
                    value: raw.clone(),
                    source,
                })?;
                assign(dest, value);
            }
            BindingKind::Bool { dest, .. } => {
                let value = parse_bool(&raw).ok_or_else(|| DecodeError::InvalidBool {
                    key: key.to_string(),
                    value: raw.clone(),
                })?;
                assign(dest, value);
            }
            BindingKind::Flag { dest } => assign(dest, true),
            BindingKind::List {
                dest, delimiter, ..
            } => assign(dest, split(&raw, delimiter).collect()),
            BindingKind::Set {
                dest, delimiter, ..
            } => assign(dest, split(&raw, delimiter).collect()),
        }
        Ok(())
    }

    /// A binding is required when it has no default to fall back on.
    pub(crate) fn is_required(&self) -> bool {
        match self {
            BindingKind::String { default, .. } => default.is_none(),
            BindingKind::Int { default, .. } => default.is_none(),
            BindingKind::Float { default, .. } => default.is_none(),
            BindingKind::Bool { default, .. } => default.is_none(),
            BindingKind::List { default, .. } => default.is_none(),
            BindingKind::Set { default, .. } => default.is_none(),
            BindingKind::Flag { .. } => false,
        }
    }
}

fn assign<T>(dest: &mut Option<&mut T>, value: T) {
    if let Some(slot) = dest.as_deref_mut() {
        *slot = value;
    }
}

fn fill<T: Clone>(dest: &mut Option<&mut T>, default: &Option<T>) -> Resolution {
    match default {
        Some(value) => {
            assign(dest, value.clone());
            Resolution::Defaulted
        }
        None => Resolution::Missing,
    }
}

/// Canonical boolean spellings.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Split `raw` on `delimiter`; an empty delimiter yields one item per character.
pub(crate) fn split<'r>(raw: &'r str, delimiter: &'r str) -> Box<dyn Iterator<Item = String> + 'r> {
    if delimiter.is_empty() {
        Box::new(raw.chars().map(String::from))
    } else {
        Box::new(raw.split(delimiter).map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_canonical_forms() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        for raw in ["", "yes", "tRuE", " true", "2"] {
            assert_eq!(parse_bool(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_split_preserves_order_and_duplicates() {
        let items: Vec<String> = split("de,fr,de", ",").collect();
        assert_eq!(items, ["de", "fr", "de"]);
    }

    #[test]
    fn test_split_edge_cases() {
        let empty: Vec<String> = split("", ",").collect();
        assert_eq!(empty, [""]);

        let chars: Vec<String> = split("abc", "").collect();
        assert_eq!(chars, ["a", "b", "c"]);

        let multi: Vec<String> = split("a::b::c", "::").collect();
        assert_eq!(multi, ["a", "b", "c"]);
    }

    #[test]
    fn test_failed_decode_leaves_destination_untouched() {
        let mut port = 8080;
        let mut binding = Binding {
            key: "PORT".into(),
            description: "port".into(),
            kind: BindingKind::Int {
                dest: Some(&mut port),
                default: None,
            },
        };
        let err = binding
            .resolve(Some("eighty".into()), "APP_PORT")
            .unwrap_err();
        assert_eq!(err.key(), "APP_PORT");
        drop(binding);
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_absent_required_is_missing() {
        let kind = BindingKind::String {
            dest: None,
            default: None,
        };
        assert!(kind.is_required());
        let mut binding = Binding {
            key: "HOST".into(),
            description: String::new(),
            kind,
        };
        assert_eq!(binding.resolve(None, "HOST"), Ok(Resolution::Missing));
    }

    #[test]
    fn test_flag_is_never_required() {
        let mut seen = true;
        let mut binding = Binding {
            key: "VERBOSE".into(),
            description: String::new(),
            kind: BindingKind::Flag {
                dest: Some(&mut seen),
            },
        };
        assert!(!binding.kind.is_required());
        assert_eq!(binding.resolve(None, "VERBOSE"), Ok(Resolution::Defaulted));
        drop(binding);
        assert!(!seen);
    }
}
