//! Helpers for classifying external errors.

/// Returns `true` when `err` reports memory exhaustion.
#[must_use]
pub fn is_out_of_memory(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::OutOfMemory
}
