//! Shell-safe rendering of the merged environment.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::EnvMapping;

/// Characters that force quoting besides control, space and non-ASCII bytes.
const NEEDS_QUOTES: &[u8] = b"\"\\`$*?['()<>|&;!~#";

/// Characters escaped with a backslash inside double quotes.
const NEEDS_ESCAPE: &[u8] = b"\"\\`$";

fn needs_quotes(byte: u8) -> bool {
    byte <= b' ' || byte >= 0x7f || NEEDS_QUOTES.contains(&byte)
}

/// Returns `value` unchanged when a POSIX shell would read it back as-is,
/// otherwise a double-quoted form with `"`, `\`, `` ` `` and `$` escaped.
///
/// # Examples
///
/// ```
/// use environment_d::shell_maybe_quote;
///
/// assert_eq!(shell_maybe_quote("/usr/bin:/bin"), "/usr/bin:/bin");
/// assert_eq!(shell_maybe_quote("hello world"), "\"hello world\"");
/// assert_eq!(shell_maybe_quote("cost $5"), "\"cost \\$5\"");
/// ```
#[must_use]
pub fn shell_maybe_quote(value: &str) -> Cow<'_, str> {
    if !value.bytes().any(needs_quotes) {
        return Cow::Borrowed(value);
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if u8::try_from(ch).is_ok_and(|byte| NEEDS_ESCAPE.contains(&byte)) {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Writes one `NAME=VALUE` line per variable to `out`, in mapping order.
///
/// # Errors
///
/// Propagates any write or flush failure from `out`.
pub fn write_env<W: Write + ?Sized>(env: &EnvMapping, out: &mut W) -> io::Result<()> {
    for (name, value) in env.iter() {
        writeln!(out, "{name}={}", shell_maybe_quote(value))?;
    }
    out.flush()
}

/// Renders the mapping as lines without trailing newlines.
#[must_use]
pub fn format_env(env: &EnvMapping) -> Vec<String> {
    env.iter()
        .map(|(name, value)| format!("{name}={}", shell_maybe_quote(value)))
        .collect()
}
