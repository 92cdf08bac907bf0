//! Fragment discovery across a [`SearchPath`].
//!
//! Directories are visited in search order and their entries sorted by name.
//! The first directory to provide a given file name wins; later directories
//! cannot contribute a file with that name, even when the winner is a mask.

use std::collections::HashSet;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tracing::debug;

use crate::{GeneratorError, Result, SearchPath, is_out_of_memory};

/// Suffix selecting environment fragments.
pub const CONF_SUFFIX: &str = ".conf";

/// Target that turns a fragment symlink into a mask.
const MASK_TARGET: &str = "/dev/null";

/// Ordered, duplicate-free list of fragment paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFiles {
    files: Vec<Utf8PathBuf>,
}

impl CandidateFiles {
    /// Wraps an explicit list of fragments, for callers that bypass discovery.
    #[must_use]
    pub const fn from_paths(files: Vec<Utf8PathBuf>) -> Self {
        Self { files }
    }

    /// Fragments in merge order.
    #[must_use]
    pub fn paths(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Iterates over the fragments in merge order.
    pub fn iter(&self) -> std::slice::Iter<'_, Utf8PathBuf> {
        self.files.iter()
    }

    /// Number of fragments.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` when nothing was found.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateFiles {
    type Item = &'a Utf8PathBuf;
    type IntoIter = std::slice::Iter<'a, Utf8PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    name: String,
    masked: bool,
}

/// Lists the fragments ending in `suffix` across `search_path`.
///
/// Missing or unreadable directories contribute nothing. Hidden entries
/// (names starting with `.`), entries that are neither files nor symlinks,
/// and names that are not valid UTF-8 are skipped. A symlink to `/dev/null`
/// masks its name: it contributes no file but still shadows same-named
/// fragments in later directories.
///
/// # Errors
///
/// Returns [`GeneratorError::Resource`] when memory runs out while listing a
/// directory or growing the result.
///
/// # Examples
///
/// ```
/// use environment_d::{SearchPath, collect_files};
///
/// # fn run() -> environment_d::Result<()> {
/// let path = SearchPath::from_dirs(["/nonexistent/environment.d"]);
/// let files = collect_files(&path, ".conf")?;
/// assert!(files.is_empty());
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub fn collect_files(search_path: &SearchPath, suffix: &str) -> Result<CandidateFiles> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut files = Vec::new();

    for dir in search_path {
        let entries = match list_directory(dir, suffix) {
            Ok(entries) => entries,
            Err(err) if is_out_of_memory(&err) => {
                return Err(GeneratorError::resource(format!("listing '{dir}'"), err));
            }
            Err(err) => {
                debug!(directory = %dir, error = %err, "skipping unreadable directory");
                continue;
            }
        };

        for Entry { name, masked } in entries {
            let path = dir.join(&name);
            if seen.contains(&name) {
                debug!(path = %path, "shadowed by an earlier directory");
                continue;
            }
            seen.try_reserve(1)
                .map_err(|err| GeneratorError::resource("recording fragment names", err))?;
            seen.insert(name);
            if masked {
                debug!(path = %path, "fragment is masked");
                continue;
            }
            files
                .try_reserve(1)
                .map_err(|err| GeneratorError::resource("collecting fragment paths", err))?;
            files.push(path);
        }
    }

    Ok(CandidateFiles { files })
}

fn list_directory(dir: &Utf8Path, suffix: &str) -> io::Result<Vec<Entry>> {
    let handle = Dir::open_ambient_dir(dir, ambient_authority())?;
    let mut entries = Vec::new();
    for item in handle.entries()? {
        let entry = item?;
        let Ok(name) = entry.file_name() else {
            debug!(directory = %dir, "skipping entry with a non UTF-8 name");
            continue;
        };
        if name.starts_with('.') || !name.ends_with(suffix) {
            continue;
        }
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) if is_out_of_memory(&err) => return Err(err),
            Err(err) => {
                debug!(directory = %dir, name = %name, error = %err, "skipping entry");
                continue;
            }
        };
        if !(file_type.is_file() || file_type.is_symlink()) {
            continue;
        }
        let masked = file_type.is_symlink() && is_mask(&dir.join(&name));
        entries.push(Entry { name, masked });
    }
    entries.sort_unstable();
    Ok(entries)
}

fn is_mask(path: &Utf8Path) -> bool {
    std::fs::read_link(path).is_ok_and(|target| target.as_os_str() == MASK_TARGET)
}
