//! Tree traversal and statistics.

use serde::{Deserialize, Serialize};

use crate::node::{Entry, EntryKind};

/// Pre-order iterator over an entry and all of its descendants.
///
/// Yields each entry together with its depth below the starting entry.
pub struct Walk<'a> {
    stack: Vec<(u32, &'a Entry)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (u32, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, entry) = self.stack.pop()?;
        if let EntryKind::Directory { children, .. } = entry.kind() {
            // Reverse so children come out in enumeration order.
            self.stack
                .extend(children.iter().rev().map(|child| (depth + 1, child)));
        }
        Some((depth, entry))
    }
}

impl Entry {
    /// Walk this entry and its descendants in pre-order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }

    /// All file entries below (and including) this entry.
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.walk()
            .map(|(_, entry)| entry)
            .filter(|entry| entry.is_file())
    }

    /// Find a descendant by its path.
    pub fn find(&self, path: &str) -> Option<&Entry> {
        self.walk()
            .map(|(_, entry)| entry)
            .find(|entry| entry.path() == path)
    }

    /// Find a descendant by its path, mutably.
    pub fn find_mut(&mut self, path: &str) -> Option<&mut Entry> {
        if self.path() == path {
            return Some(self);
        }
        let children = self.children_mut().ok()?;
        children.iter_mut().find_map(|child| {
            let prefix_match = path
                .strip_prefix(child.path())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
            if prefix_match {
                child.find_mut(path)
            } else {
                None
            }
        })
    }
}

/// Summary statistics for a built tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total size of all files in bytes.
    pub total_size: u64,
    /// Total number of files.
    pub total_files: u64,
    /// Total number of directories, excluding the root.
    pub total_dirs: u64,
    /// Number of placeholder entries for unreadable files.
    pub unreadable_files: u64,
    /// Maximum depth reached.
    pub max_depth: u32,
    /// Largest file (path, size).
    pub largest_file: Option<(String, u64)>,
}

impl TreeStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect stats for a whole tree.
    pub fn collect(root: &Entry) -> Self {
        let mut stats = Self::new();
        for (depth, entry) in root.walk() {
            if entry.is_directory() {
                if depth > 0 {
                    stats.record_dir(depth);
                }
            } else {
                stats.record_file(entry, depth);
            }
        }
        stats
    }

    /// Update stats with a file entry.
    pub fn record_file(&mut self, entry: &Entry, depth: u32) {
        self.total_files += 1;
        self.max_depth = self.max_depth.max(depth);
        if entry.is_unreadable() {
            self.unreadable_files += 1;
            return;
        }

        let size = entry.size();
        self.total_size += size;
        if self.largest_file.as_ref().is_none_or(|(_, s)| size > *s) {
            self.largest_file = Some((entry.path().to_string(), size));
        }
    }

    /// Record a directory.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}
