//! Deduplicated warnings.
//!
//! The HTML parser is lenient, so one kind of anomaly tends to repeat all over a
//! document (every stray `</div>`, every unclosed `<p>`). Warnings are keyed by
//! component and message and forwarded to the `log` facade once per key.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Global set of warnings we've already logged (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    // The set holds no invariants worth dying for; keep going after a poisoning panic.
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Warn about a recoverable anomaly (logs once per unique message)
///
/// # Example
/// ```
/// use mdfence_common::warning::warn_once;
///
/// warn_once("HTML Parser", "ignored close tag </div> with no open element");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_log = warned()
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_log {
        log::warn!("[mdfence {component}] {message}");
    }
}

/// Whether `warn_once` has already logged this message.
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    warned()
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Clear all recorded warnings (call when starting on a new document)
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        warn_once("Test", "first sighting");
        assert!(was_warned("Test", "first sighting"));
        assert!(!was_warned("Other", "first sighting"));

        // A repeat is a no-op rather than a second entry.
        warn_once("Test", "first sighting");
        assert!(was_warned("Test", "first sighting"));
    }
}
