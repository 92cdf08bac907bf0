//! Folding fragments into one [`EnvMapping`].
//!
//! Fragments are applied in collection order. A fragment that cannot be read
//! is skipped and recorded in [`MergeOutcome::recovered`]; running out of
//! memory stops the merge.

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::env_file::{EnvFile, read_env_file};
use crate::{CandidateFiles, EnvMapping, GeneratorError, Result, SourceError};

/// Result of merging a set of fragments.
#[derive(Debug, Default)]
#[must_use]
pub struct MergeOutcome {
    /// Merged variables.
    pub env: EnvMapping,
    /// Fragments that were skipped, in the order they were encountered.
    pub recovered: Vec<SourceError>,
}

/// Merges every fragment in `files`.
///
/// # Errors
///
/// Returns [`GeneratorError::Resource`] when memory runs out while reading a
/// fragment or growing the mapping. Every other per-file failure is recorded
/// in [`MergeOutcome::recovered`] instead.
///
/// # Examples
///
/// ```
/// use environment_d::{CandidateFiles, merge};
///
/// # fn run() -> environment_d::Result<()> {
/// let outcome = merge(&CandidateFiles::from_paths(vec!["/nonexistent/a.conf".into()]))?;
/// assert!(outcome.env.is_empty());
/// assert_eq!(outcome.recovered.len(), 1);
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub fn merge(files: &CandidateFiles) -> Result<MergeOutcome> {
    merge_with(files, read_env_file)
}

/// Folds `files` using `read` to load each fragment.
fn merge_with<F>(files: &CandidateFiles, mut read: F) -> Result<MergeOutcome>
where
    F: FnMut(&Utf8Path) -> Result<EnvFile, SourceError>,
{
    files
        .iter()
        .try_fold(MergeOutcome::default(), |mut outcome, path| {
            match read(path).and_then(|file| apply(&mut outcome.env, &file)) {
                Ok(applied) => debug!(path = %path, applied, "merged fragment"),
                Err(SourceError::Resource { path: failed, source }) => {
                    return Err(GeneratorError::resource(format!("reading '{failed}'"), source));
                }
                Err(err) => {
                    warn!(error = %err, "skipping fragment");
                    outcome.recovered.push(err);
                }
            }
            Ok(outcome)
        })
}

/// Reads `path` and applies its assignments to `env`, returning how many were
/// applied.
///
/// Nothing is applied when the fragment cannot be read.
///
/// # Errors
///
/// Returns the [`SourceError`] describing why the fragment was rejected.
pub fn merge_into(env: &mut EnvMapping, path: &Utf8Path) -> Result<usize, SourceError> {
    apply(env, &read_env_file(path)?)
}

fn apply(env: &mut EnvMapping, file: &EnvFile) -> Result<usize, SourceError> {
    for issue in &file.ignored {
        warn!(path = %file.path, line = issue.line, reason = %issue.kind, "ignoring line");
    }
    for assignment in &file.assignments {
        env.try_upsert(&assignment.name, &assignment.value)
            .map_err(|err| SourceError::Resource {
                path: file.path.clone(),
                source: Box::new(err),
            })?;
    }
    Ok(file.assignments.len())
}
