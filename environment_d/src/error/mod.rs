//! Error types produced while resolving, collecting and merging fragments.
//!
//! [`GeneratorError`] covers the failures that abort a run. [`SourceError`]
//! describes a single fragment that could not be used; the merger records
//! those and keeps going unless the fragment ran out of memory.

mod helpers;
mod types;

pub use helpers::is_out_of_memory;
pub use types::{GeneratorError, ResourceCause, SourceError};

/// Result alias used across the crate.
pub type Result<T, E = GeneratorError> = std::result::Result<T, E>;
