//! Truncating, always-terminated byte copy.
//!
//! [`copy`] follows the `strlcpy` contract: the destination receives as much
//! of the source as fits, is NUL-terminated whenever it has room for a single
//! byte, and the return value is the full source length so callers detect
//! truncation by comparing it with the destination capacity.

/// Copies the NUL-terminated prefix of `src` into `dst`.
///
/// `src` ends at its first NUL byte, or at the end of the slice when it holds
/// none. At most `dst.len() - 1` bytes are copied; the byte after the copy is
/// set to NUL. Nothing is written when `dst` is empty. Returns the length of
/// the source string, independent of how much was copied.
///
/// # Examples
///
/// ```
/// use environment_d::bounded::copy;
///
/// let mut dst = [0xff_u8; 4];
/// let needed = copy(&mut dst, b"environment\0");
/// assert_eq!(needed, 11);
/// assert_eq!(&dst, b"env\0");
/// assert!(needed >= dst.len(), "truncated");
/// ```
#[must_use = "compare the result with the capacity to detect truncation"]
pub fn copy(dst: &mut [u8], src: &[u8]) -> usize {
    let len = src.iter().position(|&byte| byte == 0).unwrap_or(src.len());
    let Some(room) = dst.len().checked_sub(1) else {
        return len;
    };
    let copied = len.min(room);
    let (head, tail) = dst.split_at_mut(copied);
    for (slot, &byte) in head.iter_mut().zip(src) {
        *slot = byte;
    }
    if let Some(terminator) = tail.first_mut() {
        *terminator = 0;
    }
    len
}
