//! Warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! The tree builder reports markup it had to repair or ignore through it;
//! the pipeline clears the set between documents.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable irregularity (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("HTML Parser", "ignoring unmatched end tag </p>");
/// ```
pub fn warn_once(component: &str, message: &str) {
    if record(component, message) {
        eprintln!(
            "{}",
            format!("[arbor {component}] warning: {message}").yellow()
        );
    }
}

/// Clear all recorded warnings (call between unrelated documents).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Returns `true` the first time a (component, message) pair is seen.
fn record(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key)
}
