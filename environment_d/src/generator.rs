//! End-to-end pipeline: resolve, collect, merge and print.

use std::io::Write;

use tracing::debug;

use crate::collect::{CONF_SUFFIX, CandidateFiles, collect_files};
use crate::merge::{MergeOutcome, merge};
use crate::quote::write_env;
use crate::search_path::{SearchPath, resolve_directories};
use crate::{GeneratorError, Result, SourceError};

/// Summary of a completed run.
#[derive(Debug, Default)]
#[must_use]
pub struct RunReport {
    /// Number of fragments considered after shadowing and masking.
    pub files: usize,
    /// Number of variables written.
    pub variables: usize,
    /// Fragments that were skipped.
    pub recovered: Vec<SourceError>,
}

/// Runs the generator over a fixed [`SearchPath`].
///
/// # Examples
///
/// ```
/// use environment_d::{Generator, SearchPath};
///
/// # fn run() -> environment_d::Result<()> {
/// let generator = Generator::new(SearchPath::from_dirs(["/nonexistent/environment.d"]));
/// let mut out = Vec::new();
/// let report = generator.run(&mut out)?;
/// assert_eq!(report.variables, 0);
/// assert!(out.is_empty());
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    search_path: SearchPath,
    suffix: String,
}

impl Generator {
    /// Creates a generator reading `*.conf` fragments from `search_path`.
    #[must_use]
    pub fn new(search_path: SearchPath) -> Self {
        Self {
            search_path,
            suffix: CONF_SUFFIX.to_owned(),
        }
    }

    /// Creates a generator over the default search path.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`resolve_directories`].
    pub fn from_environment() -> Result<Self> {
        resolve_directories().map(Self::new)
    }

    /// Selects fragments ending in `suffix` instead of `.conf`.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Directories searched by this generator.
    #[must_use]
    pub const fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Lists the fragments that would be merged.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Resource`] when memory runs out.
    pub fn collect(&self) -> Result<CandidateFiles> {
        collect_files(&self.search_path, &self.suffix)
    }

    /// Collects and merges the fragments without printing them.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Resource`] when memory runs out.
    pub fn load(&self) -> Result<(CandidateFiles, MergeOutcome)> {
        let files = self.collect()?;
        let outcome = merge(&files)?;
        Ok((files, outcome))
    }

    /// Merges the fragments and writes the result to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Resource`] when memory runs out and
    /// [`GeneratorError::Output`] when `out` rejects the output.
    pub fn run<W: Write + ?Sized>(&self, out: &mut W) -> Result<RunReport> {
        let (files, MergeOutcome { env, recovered }) = self.load()?;
        write_env(&env, out).map_err(GeneratorError::Output)?;
        debug!(
            files = files.len(),
            variables = env.len(),
            skipped = recovered.len(),
            "environment generated"
        );
        Ok(RunReport {
            files: files.len(),
            variables: env.len(),
            recovered,
        })
    }
}

/// Resolves the default search path and prints the merged environment.
///
/// # Errors
///
/// Returns any fatal [`GeneratorError`] raised along the pipeline.
pub fn load_and_print<W: Write + ?Sized>(out: &mut W) -> Result<RunReport> {
    Generator::from_environment()?.run(out)
}
