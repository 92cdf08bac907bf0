//! Ordered list of directories searched for environment fragments.
//!
//! A [`SearchPath`] lists the per-user configuration directory first, then
//! the compiled-in system roots. Order decides shadowing during collection:
//! a fragment name seen in an earlier directory hides every same-named
//! fragment further down the list.
//!
//! The user directory sits at the front even though it is the most specific
//! layer. This mirrors the generator the format comes from and must not be
//! reordered.

use std::ffi::OsString;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use dirs::home_dir;
use tracing::debug;

use crate::{GeneratorError, Result};

mod builder;

pub use builder::SearchPathBuilder;

/// Subdirectory appended to every configuration root.
pub const ENVIRONMENT_D: &str = "environment.d";

/// System configuration roots, in the order the directories are searched.
pub const SYSTEM_CONFIG_ROOTS: [&str; 4] = ["/etc", "/run", "/usr/local/lib", "/usr/lib"];

/// Ordered, duplicate-free directory list.
///
/// # Examples
///
/// ```
/// use environment_d::SearchPath;
///
/// let path = SearchPath::from_dirs(["/home/u/.config/environment.d", "/etc/environment.d", "/etc/environment.d"]);
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.dirs()[0], "/home/u/.config/environment.d");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<Utf8PathBuf>,
}

impl SearchPath {
    /// Creates a builder for directories named `subdirectory`.
    #[must_use]
    pub fn builder(subdirectory: impl Into<String>) -> SearchPathBuilder {
        SearchPathBuilder::new(subdirectory)
    }

    /// Builds a search path from `dirs`, keeping the first occurrence of each
    /// directory.
    #[must_use]
    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let mut path = Self::default();
        for dir in dirs {
            path.push_unique(dir.into());
        }
        path
    }

    /// Appends `dir` unless it is empty or already present.
    ///
    /// Returns `true` when the directory was added.
    pub fn push_unique(&mut self, dir: Utf8PathBuf) -> bool {
        if dir.as_str().is_empty() || self.dirs.contains(&dir) {
            return false;
        }
        self.dirs.push(dir);
        true
    }

    /// Inserts `dir` at the front, dropping any later copy of it.
    pub fn prepend(&mut self, dir: Utf8PathBuf) {
        if dir.as_str().is_empty() {
            return;
        }
        self.dirs.retain(|existing| existing != &dir);
        self.dirs.insert(0, dir);
    }

    /// Directories in search order.
    #[must_use]
    pub fn dirs(&self) -> &[Utf8PathBuf] {
        &self.dirs
    }

    /// Iterates over the directories in search order.
    pub fn iter(&self) -> std::slice::Iter<'_, Utf8PathBuf> {
        self.dirs.iter()
    }

    /// Number of directories.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Returns `true` when no directory will be searched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl<'a> IntoIterator for &'a SearchPath {
    type Item = &'a Utf8PathBuf;
    type IntoIter = std::slice::Iter<'a, Utf8PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<SearchPath> for Vec<Utf8PathBuf> {
    fn from(path: SearchPath) -> Self {
        path.dirs
    }
}

/// Resolves the default search path: the user's `environment.d` followed by
/// the system roots.
///
/// # Errors
///
/// Returns [`GeneratorError::PathResolution`] when `$HOME` or
/// `$XDG_CONFIG_HOME` holds a value that cannot name the user directory,
/// and [`GeneratorError::Resource`] when the list cannot be allocated.
pub fn resolve_directories() -> Result<SearchPath> {
    SearchPathBuilder::new(ENVIRONMENT_D).build()
}

/// Locates the user's configuration home.
///
/// `$XDG_CONFIG_HOME` wins when it is absolute; relative values are ignored
/// as the XDG base directory rules require. Otherwise `$HOME/.config` is
/// used, consulting the platform account database when `$HOME` is unset.
/// `Ok(None)` means no home directory is configured at all.
///
/// # Errors
///
/// Returns [`GeneratorError::PathResolution`] when `$HOME` is relative or
/// when the chosen value is not valid UTF-8.
pub fn user_config_home() -> Result<Option<Utf8PathBuf>> {
    if let Some(value) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        if Path::new(&value).is_absolute() {
            return utf8_dir("XDG_CONFIG_HOME", value).map(Some);
        }
        debug!(value = ?value, "ignoring relative $XDG_CONFIG_HOME");
    }

    match std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        Some(home) if Path::new(&home).is_absolute() => {
            Ok(Some(utf8_dir("HOME", home)?.join(".config")))
        }
        Some(home) => Err(GeneratorError::PathResolution {
            variable: "HOME",
            value: home,
            reason: "path is not absolute",
        }),
        None => {
            let fallback = home_dir().and_then(|home| Utf8PathBuf::from_path_buf(home).ok());
            if fallback.is_none() {
                debug!("no home directory configured; skipping the user directory");
            }
            Ok(fallback.map(|home| home.join(".config")))
        }
    }
}

fn utf8_dir(variable: &'static str, value: OsString) -> Result<Utf8PathBuf> {
    match value.into_string() {
        Ok(text) => Ok(Utf8PathBuf::from(text)),
        Err(raw) => Err(GeneratorError::PathResolution {
            variable,
            value: raw,
            reason: "path is not valid UTF-8",
        }),
    }
}

pub(crate) fn join_subdirectory(root: &Utf8Path, subdirectory: &str) -> Utf8PathBuf {
    if subdirectory.is_empty() {
        root.to_owned()
    } else {
        root.join(subdirectory)
    }
}

#[cfg(test)]
mod tests;
