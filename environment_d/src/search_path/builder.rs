//! Builder for [`SearchPath`].
//!
//! The builder lets callers swap the subdirectory name, the system roots and
//! the source of the user configuration home before resolving the final
//! directory list.

use camino::Utf8PathBuf;

use super::{SYSTEM_CONFIG_ROOTS, SearchPath, join_subdirectory, user_config_home};
use crate::{GeneratorError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum UserRoot {
    Environment,
    Explicit(Utf8PathBuf),
    Disabled,
}

/// Builder for [`SearchPath`].
///
/// # Examples
///
/// ```rust
/// use environment_d::SearchPath;
///
/// # fn run() -> environment_d::Result<()> {
/// let path = SearchPath::builder("environment.d")
///     .system_roots(["/etc", "/usr/lib"])
///     .user_config_home("/home/user/.config")
///     .build()?;
/// assert_eq!(
///     path.dirs(),
///     [
///         "/home/user/.config/environment.d",
///         "/etc/environment.d",
///         "/usr/lib/environment.d",
///     ]
/// );
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SearchPathBuilder {
    subdirectory: String,
    system_roots: Vec<Utf8PathBuf>,
    user_root: UserRoot,
}

impl SearchPathBuilder {
    /// Creates a builder for `subdirectory` with the compiled-in system roots
    /// and the user configuration home taken from the environment.
    #[must_use]
    pub fn new(subdirectory: impl Into<String>) -> Self {
        Self {
            subdirectory: subdirectory.into(),
            system_roots: SYSTEM_CONFIG_ROOTS.iter().map(Utf8PathBuf::from).collect(),
            user_root: UserRoot::Environment,
        }
    }

    /// Replaces the system roots. Each root is joined with the subdirectory.
    #[must_use]
    pub fn system_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.system_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Removes every system root.
    #[must_use]
    pub fn clear_system_roots(mut self) -> Self {
        self.system_roots.clear();
        self
    }

    /// Uses `home` as the user configuration home instead of reading
    /// `$XDG_CONFIG_HOME` and `$HOME`.
    #[must_use]
    pub fn user_config_home(mut self, home: impl Into<Utf8PathBuf>) -> Self {
        self.user_root = UserRoot::Explicit(home.into());
        self
    }

    /// Leaves the user directory out of the search path.
    #[must_use]
    pub fn without_user_directory(mut self) -> Self {
        self.user_root = UserRoot::Disabled;
        self
    }

    /// Resolves the directory list.
    ///
    /// System roots come first in their configured order, then the user
    /// directory is prepended so it is searched before all of them.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::PathResolution`] when the user directory is
    /// taken from the environment and cannot be resolved, and
    /// [`GeneratorError::Resource`] when the list cannot be allocated.
    pub fn build(&self) -> Result<SearchPath> {
        let mut dirs = Vec::new();
        dirs.try_reserve_exact(self.system_roots.len() + 1)
            .map_err(|err| GeneratorError::resource("allocating the search path", err))?;
        let mut path = SearchPath { dirs };

        for root in &self.system_roots {
            path.push_unique(join_subdirectory(root, &self.subdirectory));
        }

        let user_home = match &self.user_root {
            UserRoot::Environment => user_config_home()?,
            UserRoot::Explicit(home) => Some(home.clone()),
            UserRoot::Disabled => None,
        };
        if let Some(home) = user_home {
            path.prepend(join_subdirectory(&home, &self.subdirectory));
        }

        tracing::debug!(dirs = ?path.dirs(), "resolved search path");
        Ok(path)
    }
}
