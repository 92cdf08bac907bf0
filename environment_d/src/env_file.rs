//! Reading and splitting `NAME=VALUE` fragments.
//!
//! A fragment holds one assignment per line. Lines starting with `#` or `;`
//! (after leading whitespace) are comments and blank lines are skipped. The
//! first `=` splits name from value; both are trimmed of surrounding ASCII
//! whitespace and otherwise taken literally, with no quote removal, escapes
//! or variable expansion. Each line is decoded on its own, so a stray
//! non-UTF-8 byte only costs the line it appears on.

use std::fmt;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::File};

use crate::SourceError;

/// One `NAME=VALUE` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Variable name; never empty and never contains `=`.
    pub name: String,
    /// Variable value, possibly empty.
    pub value: String,
    /// One-based line number.
    pub line: usize,
}

/// Why a line was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineIssueKind {
    /// The line has no `=`.
    MissingSeparator,
    /// Nothing precedes the `=`.
    EmptyName,
    /// The line is not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for LineIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => f.write_str("missing '=' separator"),
            Self::EmptyName => f.write_str("empty variable name"),
            Self::InvalidUtf8 => f.write_str("invalid UTF-8"),
        }
    }
}

/// A line that was skipped without rejecting the rest of the fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineIssue {
    /// One-based line number.
    pub line: usize,
    /// Reason the line was skipped.
    pub kind: LineIssueKind,
}

/// Parsed contents of one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    /// Fragment path.
    pub path: Utf8PathBuf,
    /// Assignments in file order.
    pub assignments: Vec<Assignment>,
    /// Lines that were ignored.
    pub ignored: Vec<LineIssue>,
}

impl EnvFile {
    /// Splits `contents` into assignments.
    ///
    /// # Examples
    ///
    /// ```
    /// use environment_d::env_file::EnvFile;
    ///
    /// let file = EnvFile::parse("a.conf", "# comment\nPATH=/usr/bin:/bin\nURL = a=b \n");
    /// let pairs: Vec<_> = file
    ///     .assignments
    ///     .iter()
    ///     .map(|a| (a.name.as_str(), a.value.as_str()))
    ///     .collect();
    /// assert_eq!(pairs, [("PATH", "/usr/bin:/bin"), ("URL", "a=b")]);
    /// ```
    #[must_use]
    pub fn parse(path: impl Into<Utf8PathBuf>, contents: &str) -> Self {
        Self::parse_bytes(path, contents.as_bytes())
    }

    /// Splits raw `contents` into assignments, decoding each line separately.
    ///
    /// Lines that are not valid UTF-8 are reported as
    /// [`LineIssueKind::InvalidUtf8`] unless they are blank or comments.
    #[must_use]
    pub fn parse_bytes(path: impl Into<Utf8PathBuf>, contents: &[u8]) -> Self {
        let mut file = Self {
            path: path.into(),
            ..Self::default()
        };

        for (index, raw) in contents.split(|&byte| byte == b'\n').enumerate() {
            let line = index + 1;
            let bytes = raw.strip_suffix(b"\r").unwrap_or(raw).trim_ascii_start();
            if bytes.is_empty() || bytes.starts_with(b"#") || bytes.starts_with(b";") {
                continue;
            }
            let Ok(text) = std::str::from_utf8(bytes) else {
                file.ignored.push(LineIssue {
                    line,
                    kind: LineIssueKind::InvalidUtf8,
                });
                continue;
            };
            file.push_line(line, text);
        }

        file
    }

    fn push_line(&mut self, line: usize, text: &str) {
        let Some((name, value)) = text.split_once('=') else {
            self.ignored.push(LineIssue {
                line,
                kind: LineIssueKind::MissingSeparator,
            });
            return;
        };
        let trimmed_name = name.trim_ascii();
        if trimmed_name.is_empty() {
            self.ignored.push(LineIssue {
                line,
                kind: LineIssueKind::EmptyName,
            });
            return;
        }
        self.assignments.push(Assignment {
            name: trimmed_name.to_owned(),
            value: value.trim_ascii().to_owned(),
            line,
        });
    }
}

/// Reads and parses the fragment at `path`.
///
/// The whole file is loaded before anything is parsed, so a read failure
/// never yields a partial fragment. The path is opened with ambient
/// authority, so symlinked fragments resolve wherever they point. The buffer
/// is reserved up front with `try_reserve_exact` so running out of memory
/// surfaces as [`SourceError::Resource`] rather than aborting the process.
///
/// # Errors
///
/// Returns [`SourceError::Access`] when the file cannot be opened or read and
/// [`SourceError::Resource`] when memory runs out.
pub fn read_env_file(path: &Utf8Path) -> Result<EnvFile, SourceError> {
    let bytes = read_bytes(path).map_err(|err| SourceError::from_io(path, err))?;
    Ok(EnvFile::parse_bytes(path, &bytes))
}

fn read_bytes(path: &Utf8Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open_ambient(path, ambient_authority())?;
    let len = usize::try_from(file.metadata()?.len()).unwrap_or(usize::MAX);
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(len)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::OutOfMemory, err))?;
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use test_helpers::fragments::FragmentTree;

    use super::*;

    fn pairs(file: &EnvFile) -> Vec<(&str, &str)> {
        file.assignments
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect()
    }

    #[rstest]
    #[case("FOO=1", ("FOO", "1"))]
    #[case("FOO=", ("FOO", ""))]
    #[case("FOO=a=b=c", ("FOO", "a=b=c"))]
    #[case("  FOO = spaced value  ", ("FOO", "spaced value"))]
    #[case("FOO=\"kept quotes\"", ("FOO", "\"kept quotes\""))]
    #[case("FOO=$HOME/bin", ("FOO", "$HOME/bin"))]
    #[case("FOO=value # not a comment", ("FOO", "value # not a comment"))]
    #[case("FOO=dos\r", ("FOO", "dos"))]
    fn splits_on_first_equals(#[case] line: &str, #[case] expected: (&str, &str)) {
        let file = EnvFile::parse("t.conf", line);
        assert_eq!(pairs(&file), [expected]);
        assert!(file.ignored.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("   \t")]
    #[case("# FOO=1")]
    #[case("  ; FOO=1")]
    fn blank_and_comment_lines_are_skipped(#[case] line: &str) {
        let file = EnvFile::parse("t.conf", line);
        assert!(file.assignments.is_empty());
        assert!(file.ignored.is_empty());
    }

    #[test]
    fn malformed_lines_are_reported_and_the_rest_applies() {
        let file = EnvFile::parse("t.conf", "GOOD=1\nJUNK\n=orphan\nALSO_GOOD=2\n");
        assert_eq!(pairs(&file), [("GOOD", "1"), ("ALSO_GOOD", "2")]);
        assert_eq!(
            file.ignored,
            [
                LineIssue {
                    line: 2,
                    kind: LineIssueKind::MissingSeparator,
                },
                LineIssue {
                    line: 3,
                    kind: LineIssueKind::EmptyName,
                },
            ]
        );
    }

    #[test]
    fn repeated_names_keep_file_order() {
        let file = EnvFile::parse("t.conf", "A=1\nB=2\nA=3\n");
        assert_eq!(pairs(&file), [("A", "1"), ("B", "2"), ("A", "3")]);
        assert_eq!(file.assignments.last().map(|a| a.line), Some(3));
    }

    #[rstest]
    fn reads_fragments_from_disk() -> Result<()> {
        let tree = FragmentTree::new()?;
        let path = tree.write("sys", "a.conf", "FOO=1\nBAR=two words\n")?;
        let file = read_env_file(&path)?;
        ensure!(file.path == path);
        ensure!(pairs(&file) == [("FOO", "1"), ("BAR", "two words")]);
        Ok(())
    }

    #[rstest]
    fn missing_fragment_is_an_access_error() -> Result<()> {
        let tree = FragmentTree::new()?;
        let path = tree.dir("sys").join("absent.conf");
        let result = read_env_file(&path);
        ensure!(
            matches!(result, Err(SourceError::Access { .. })),
            "expected access error, got {result:?}"
        );
        Ok(())
    }

    #[test]
    fn invalid_utf8_only_drops_its_own_line() {
        let file = EnvFile::parse_bytes("t.conf", b"GOOD=1\nBAD=\xff\xfe\n# \xff comment\nAFTER=2\n");
        assert_eq!(pairs(&file), [("GOOD", "1"), ("AFTER", "2")]);
        assert_eq!(
            file.ignored,
            [LineIssue {
                line: 2,
                kind: LineIssueKind::InvalidUtf8,
            }]
        );
    }

    #[cfg(unix)]
    #[rstest]
    #[case::absolute(true)]
    #[case::relative(false)]
    fn symlinked_fragments_are_followed_outside_their_directory(
        #[case] absolute: bool,
    ) -> Result<()> {
        let tree = FragmentTree::new()?;
        let target = tree.write("store", "shared.env", "FOO=1\n")?;
        let dir = tree.mkdir("sys/environment.d")?;
        let link = dir.join("shared.conf");
        if absolute {
            std::os::unix::fs::symlink(&target, &link)?;
        } else {
            std::os::unix::fs::symlink("../../store/shared.env", &link)?;
        }

        let file = read_env_file(&link)?;
        ensure!(pairs(&file) == [("FOO", "1")], "got {file:?}");
        Ok(())
    }
}
