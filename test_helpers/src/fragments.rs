//! Temporary directory trees holding `environment.d` fragments.
//!
//! Files are written through `cap-std` so fixtures never escape the
//! temporary root.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tempfile::TempDir;

/// A temporary root under which test directories and fragments are created.
///
/// # Examples
///
/// ```
/// use environment_d_test_helpers::fragments::FragmentTree;
///
/// # fn run() -> anyhow::Result<()> {
/// let tree = FragmentTree::new()?;
/// let file = tree.write("sys", "a.conf", "FOO=1\n")?;
/// assert_eq!(file, tree.dir("sys").join("a.conf"));
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug)]
pub struct FragmentTree {
    root: Utf8PathBuf,
    dir: Dir,
    _temp: TempDir,
}

impl FragmentTree {
    /// Creates an empty tree inside a fresh temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created or its path is
    /// not valid UTF-8.
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("create fragment tree")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|path| anyhow!("temporary directory is not UTF-8: {}", path.display()))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .with_context(|| format!("open {root}"))?;
        Ok(Self {
            root,
            dir,
            _temp: temp,
        })
    }

    /// Root of the tree.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of `relative` inside the tree. Nothing is created.
    #[must_use]
    pub fn dir(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Creates `relative` (and its parents) and returns its absolute path.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn mkdir(&self, relative: &str) -> Result<Utf8PathBuf> {
        self.dir
            .create_dir_all(relative)
            .with_context(|| format!("create {relative}"))?;
        Ok(self.dir(relative))
    }

    /// Writes `contents` to `relative/name`, creating `relative` first. An
    /// empty `relative` writes directly into the root.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory or the file cannot be written.
    pub fn write(&self, relative: &str, name: &str, contents: impl AsRef<[u8]>) -> Result<Utf8PathBuf> {
        if !relative.is_empty() {
            self.mkdir(relative)?;
        }
        let file = Utf8Path::new(relative).join(name);
        self.dir
            .write(&file, contents)
            .with_context(|| format!("write {file}"))?;
        Ok(self.root.join(file))
    }
}
