//! Merges layered `environment.d` fragments into one environment.
//!
//! The pipeline has four stages:
//!
//! 1. [`resolve_directories`] builds the [`SearchPath`]: the user's
//!    `environment.d` followed by `/etc`, `/run`, `/usr/local/lib` and
//!    `/usr/lib` variants of it.
//! 2. [`collect_files`] lists `*.conf` fragments. A name found in an earlier
//!    directory shadows the same name further down the path.
//! 3. [`merge()`] applies the fragments in order. Later values win while the
//!    first definition of a name fixes where it is printed. Unreadable
//!    fragments are skipped.
//! 4. [`write_env`] prints `NAME=VALUE` lines with values quoted for a POSIX
//!    shell when needed.
//!
//! [`Generator`] ties the stages together.
//!
//! ```no_run
//! # fn run() -> environment_d::Result<()> {
//! let report = environment_d::load_and_print(&mut std::io::stdout().lock())?;
//! for skipped in &report.recovered {
//!     eprintln!("skipped {}", skipped.path());
//! }
//! # Ok(())
//! # }
//! ```

pub mod bounded;
mod collect;
pub mod env_file;
mod error;
mod generator;
mod mapping;
mod merge;
mod quote;
mod search_path;

pub use collect::{CONF_SUFFIX, CandidateFiles, collect_files};
pub use error::{GeneratorError, ResourceCause, Result, SourceError, is_out_of_memory};
pub use generator::{Generator, RunReport, load_and_print};
pub use mapping::EnvMapping;
pub use merge::{MergeOutcome, merge, merge_into};
pub use quote::{format_env, shell_maybe_quote, write_env};
pub use search_path::{
    ENVIRONMENT_D, SYSTEM_CONFIG_ROOTS, SearchPath, SearchPathBuilder, resolve_directories,
    user_config_home,
};
