//! Fatal and recoverable error enums.

use std::ffi::OsString;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Boxed cause carried by resource exhaustion errors.
pub type ResourceCause = Box<dyn std::error::Error + Send + Sync>;

/// Failures that abort the whole run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    /// Memory ran out while building one of the pipeline structures.
    #[error("resource exhausted while {operation}: {source}")]
    Resource {
        /// What the pipeline was doing when the allocation failed.
        operation: String,
        /// Underlying allocation or I/O failure.
        #[source]
        source: ResourceCause,
    },

    /// The per-user configuration directory could not be derived.
    #[error("cannot resolve the user configuration directory from ${variable}={value:?}: {reason}")]
    PathResolution {
        /// Environment variable that held the unusable value.
        variable: &'static str,
        /// Raw value of the variable.
        value: OsString,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The command line carried arguments the generator does not accept.
    #[error("This program takes no arguments: {0}")]
    Arguments(#[from] Box<clap::Error>),

    /// Writing the merged environment failed.
    #[error("failed to write the merged environment: {0}")]
    Output(#[source] io::Error),
}

impl GeneratorError {
    /// Builds a [`GeneratorError::Resource`] for `operation`.
    ///
    /// # Examples
    ///
    /// ```
    /// use environment_d::GeneratorError;
    ///
    /// let mut buffer: Vec<u8> = Vec::new();
    /// let failure = buffer.try_reserve(usize::MAX).unwrap_err();
    /// let err = GeneratorError::resource("growing a buffer", failure);
    /// assert!(err.to_string().starts_with("resource exhausted while growing a buffer"));
    /// ```
    #[must_use]
    pub fn resource(operation: impl Into<String>, source: impl Into<ResourceCause>) -> Self {
        Self::Resource {
            operation: operation.into(),
            source: source.into(),
        }
    }
}

/// A fragment that could not be read. Only [`SourceError::Resource`] is fatal.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The fragment could not be opened or read.
    #[error("failed to read '{path}': {source}")]
    Access {
        /// Fragment path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Memory ran out while reading the fragment.
    #[error("resource exhausted while reading '{path}': {source}")]
    Resource {
        /// Fragment path.
        path: Utf8PathBuf,
        /// Allocation or I/O failure.
        #[source]
        source: ResourceCause,
    },
}

impl SourceError {
    /// Classifies an I/O failure on `path`, separating memory exhaustion from
    /// ordinary access problems.
    #[must_use]
    pub fn from_io(path: &Utf8Path, source: io::Error) -> Self {
        if super::is_out_of_memory(&source) {
            Self::Resource {
                path: path.to_owned(),
                source: Box::new(source),
            }
        } else {
            Self::Access {
                path: path.to_owned(),
                source,
            }
        }
    }

    /// Path of the fragment that failed.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Access { path, .. } | Self::Resource { path, .. } => path,
        }
    }

    /// Returns `true` when the failure must abort the merge.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Resource { .. })
    }
}
