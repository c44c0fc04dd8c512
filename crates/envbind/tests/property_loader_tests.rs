//! Property-based tests for the loader.
//!
//! These tests use randomly generated keys and values to check the
//! invariants that hold for every input:
//! - required string bindings load exactly the stored value
//! - absent required keys are reported in registration order
//! - list splitting preserves every item, set splitting deduplicates
//! - prefixes compose by concatenation

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;

use envbind::Loader;

/// Strategy for generating environment-style keys.
fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,15}".prop_map(String::from)
}

/// Strategy for list items that never contain the delimiter.
fn items_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{0,6}", 1..8)
}

proptest! {
    #[test]
    fn prop_required_string_loads_value(key in key_strategy(), value in ".*") {
        let mut dest = String::new();
        let mut loader = Loader::from_map([(key.clone(), value.clone())]);
        loader.string(&key, Some(&mut dest), "value");
        prop_assert!(loader.load().is_ok());
        drop(loader);
        prop_assert_eq!(dest, value);
    }

    #[test]
    fn prop_missing_keys_reported_in_order(keys in prop::collection::vec(key_strategy(), 1..6)) {
        let mut loader = Loader::from_map(HashMap::<String, String>::new());
        for key in &keys {
            loader.string(key, None, "missing");
        }
        let err = loader.load().unwrap_err();
        prop_assert_eq!(err.missing(), keys.as_slice());
        prop_assert_eq!(
            err.to_string(),
            format!("missing environment variables: {}", keys.join(", "))
        );
    }

    #[test]
    fn prop_list_and_set_split(items in items_strategy()) {
        let joined = items.join(",");
        let mut list = Vec::new();
        let mut set = HashSet::new();
        let mut loader = Loader::from_map([("L", joined.clone()), ("S", joined)]);
        loader
            .list("L", Some(&mut list), ",", "list")
            .set("S", Some(&mut set), ",", "set");
        prop_assert!(loader.load().is_ok());
        drop(loader);

        let expected: HashSet<String> = items.iter().cloned().collect();
        prop_assert_eq!(list, items);
        prop_assert_eq!(set, expected);
    }

    #[test]
    fn prop_prefixes_concatenate(a in key_strategy(), b in key_strategy(), key in key_strategy()) {
        let full = format!("{a}{b}{key}");
        let mut loader = Loader::from_map([(full.clone(), "v")]).prefix(a).prefix(b);
        loader.string(&key, None, "prefixed");
        prop_assert_eq!(loader.effective_key(&key), full.clone());
        prop_assert_eq!(loader.help(), format!("{full} -- prefixed\n"));
        prop_assert!(loader.load().is_ok());
    }
}
