//! Successor filename generation.
//!
//! `foo.txt` becomes `foo-1.txt`, `foo-1.txt` becomes `foo-2.txt`, and so on.
//! Only the last dot-separated segment is treated as the extension, so
//! `foo.tar.gz` becomes `foo.tar-1.gz`.

use std::collections::HashSet;

use fstree_core::Entry;
use tracing::debug;

use crate::error::NameError;

/// Maximum number of candidates tried by [`unique_name`].
pub const MAX_RENAME_ATTEMPTS: usize = 1000;

/// Produce the next name in the `name-N.ext` sequence.
///
/// This is a pure string transformation. It does not check whether the
/// returned name is actually free.
pub fn next_unique_name(name: &str) -> String {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (name, None),
    };

    let next_stem = match stem.rsplit_once('-') {
        None => format!("{stem}-1"),
        Some((head, suffix)) => match parse_suffix(suffix).and_then(|n| n.checked_add(1)) {
            Some(n) => format!("{head}-{n}"),
            // Not a counter we recognize: start a new one.
            None => format!("{stem}-1"),
        },
    };

    match ext {
        Some(ext) => format!("{next_stem}.{ext}"),
        None => next_stem,
    }
}

/// Parse a canonical base-10 counter. Rejects forms that do not round-trip,
/// such as `007` or `+5`.
fn parse_suffix(suffix: &str) -> Option<u64> {
    let n: u64 = suffix.parse().ok()?;
    (n.to_string() == suffix).then_some(n)
}

/// Return `name` if it is free, otherwise the first free successor.
pub fn unique_name(
    name: &str,
    mut exists: impl FnMut(&str) -> bool,
) -> Result<String, NameError> {
    let mut candidate = name.to_string();
    for _ in 0..MAX_RENAME_ATTEMPTS {
        if !exists(&candidate) {
            return Ok(candidate);
        }
        candidate = next_unique_name(&candidate);
    }
    debug!(name, "no free name found");
    Err(NameError::Exhausted {
        name: name.to_string(),
        attempts: MAX_RENAME_ATTEMPTS,
    })
}

/// Choose a name for a new child of `dir` that collides with none of its
/// current children.
pub fn unique_child_name(dir: &Entry, name: &str) -> Result<String, NameError> {
    let taken: HashSet<&str> = dir.children()?.iter().map(|child| child.name()).collect();
    unique_name(name, |candidate| taken.contains(candidate))
}
