//! Helpers for safely mutating environment variables in tests.
//!
//! Every mutation happens under a global re-entrant mutex and returns an RAII
//! guard that restores the previous value (or removes the variable) on drop.
//! [`UserDirsScope`] keeps the lock for its whole lifetime so a test can pin
//! `$XDG_CONFIG_HOME` and `$HOME` without another test changing them
//! underneath.
//!
//! # Examples
//!
//! ```
//! use environment_d_test_helpers::env;
//!
//! let _g = env::set_var("ENVIRONMENT_D_EXAMPLE", "1");
//! assert_eq!(std::env::var("ENVIRONMENT_D_EXAMPLE").as_deref(), Ok("1"));
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Variables consulted when resolving the user configuration home.
pub const USER_DIR_VARS: [&str; 2] = ["XDG_CONFIG_HOME", "HOME"];

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        let original = self.original.take();
        // SAFETY: environment writes are serialised by `ENV_MUTEX`.
        unsafe {
            match original {
                Some(value) => env::set_var(&self.key, value),
                None => env::remove_var(&self.key),
            }
        }
    }
}

fn mutate(key: String, value: Option<&OsStr>) -> EnvVarGuard {
    let _lock = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    // SAFETY: environment writes are serialised by `ENV_MUTEX`.
    unsafe {
        match value {
            Some(new_value) => env::set_var(&key, new_value),
            None => env::remove_var(&key),
        }
    }
    EnvVarGuard { key, original }
}

/// Sets an environment variable and returns a guard restoring its prior value.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    mutate(key.into(), Some(value.as_ref()))
}

/// Removes an environment variable and returns a guard restoring its prior value.
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    mutate(key.into(), None)
}

/// Holds the environment lock while `$XDG_CONFIG_HOME` and `$HOME` are pinned.
///
/// Both variables start out removed; use [`UserDirsScope::xdg_config_home`]
/// and [`UserDirsScope::home`] to give them values. Dropping the scope
/// restores the originals before releasing the lock.
///
/// # Examples
///
/// ```
/// use environment_d_test_helpers::env::UserDirsScope;
///
/// let scope = UserDirsScope::cleared().home("/home/tester");
/// assert_eq!(std::env::var("HOME").as_deref(), Ok("/home/tester"));
/// assert!(std::env::var_os("XDG_CONFIG_HOME").is_none());
/// drop(scope);
/// ```
#[must_use = "dropping releases the environment lock and restores the variables"]
pub struct UserDirsScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl UserDirsScope {
    /// Acquires the lock and removes both user directory variables.
    pub fn cleared() -> Self {
        let lock = ENV_MUTEX.lock();
        let guards = USER_DIR_VARS.iter().map(|key| remove_var(*key)).collect();
        Self {
            guards,
            _lock: lock,
        }
    }

    /// Sets `$XDG_CONFIG_HOME` for the lifetime of the scope.
    pub fn xdg_config_home(mut self, value: impl AsRef<OsStr>) -> Self {
        self.guards.push(set_var("XDG_CONFIG_HOME", value));
        self
    }

    /// Sets `$HOME` for the lifetime of the scope.
    pub fn home(mut self, value: impl AsRef<OsStr>) -> Self {
        self.guards.push(set_var("HOME", value));
        self
    }
}

impl Drop for UserDirsScope {
    fn drop(&mut self) {
        // Restore in reverse so stacked guards for the same key unwind correctly,
        // and do it before `_lock` is released.
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

#[cfg(test)]
mod tests;
