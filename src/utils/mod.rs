//! Small shared helpers.
//!
//! - [`hash`]: blake3 content hashes for write-if-changed and digests
//! - [`path`]: filesystem path normalization and relative display
//! - plural helpers for log messages

pub mod hash;
pub mod path;

/// Return "s" suffix for plural counts
///
/// # Examples
///
/// - `plural_s(0)` -> `"s"` (0 files)
/// - `plural_s(1)` -> `""` (1 file)
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(3, "violation")` -> `"3 violations"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}
