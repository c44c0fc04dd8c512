//! Tests for the typed variable loader.
//!
//! Responsibilities:
//! - Test source selection (map, prefix, process environment, dotenv).
//! - Test each binding kind's decode and default behavior.
//! - Test error aggregation and help rendering.
//!
//! Invariants:
//! - Tests that touch the process environment use `serial_test` and `env_lock()`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
