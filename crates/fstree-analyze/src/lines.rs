//! Line counting over raw file bytes.
//!
//! Only the line-feed byte (`0x0A`) terminates a line. A CRLF pair counts
//! once because of its LF; a lone CR (old Mac line ending) is not a
//! terminator, so such files are undercounted. No text decoding is done,
//! which means binary content still gets a number. Use [`is_binary`] to
//! decide whether that number is meaningful.
//!
//! Counting a file reads its whole content into memory, so the memory cost
//! of a count is proportional to the file size.
//!
//! [`is_binary`]: crate::is_binary

use std::io;
use std::sync::Arc;

use derive_builder::Builder;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fstree_core::{Blob, Entry, TreeError};

use crate::binary::is_binary;

/// Metadata key under which [`LineCounter::annotate`] stores line counts.
pub const LINES_META_KEY: &str = "lines";

/// Count the lines in a byte buffer.
///
/// Every LF byte ends a line, and a non-empty trailing run without a final
/// LF counts as one more line.
pub fn count_lines(bytes: &[u8]) -> u64 {
    let Some(&last) = bytes.last() else {
        return 0;
    };
    let terminators = bytes.iter().filter(|&&b| b == b'\n').count() as u64;
    if last == b'\n' {
        terminators
    } else {
        terminators + 1
    }
}

/// Count the lines of a file's content.
///
/// Empty files are answered from their size without reading.
pub async fn count_blob_lines(blob: &dyn Blob) -> io::Result<u64> {
    if blob.size() == 0 {
        return Ok(0);
    }
    let bytes = blob.bytes().await?;
    Ok(count_lines(&bytes))
}

/// Configuration for tree-wide line counting.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct LineConfig {
    /// Skip files classified as binary by extension.
    #[builder(default = "true")]
    pub skip_binary: bool,

    /// Skip files larger than this many bytes (None = no limit).
    #[builder(default)]
    pub max_file_size: Option<u64>,

    /// Maximum number of files read concurrently.
    #[builder(default = "16")]
    pub max_concurrency: usize,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            skip_binary: true,
            max_file_size: None,
            max_concurrency: 16,
        }
    }
}

impl LineConfig {
    /// Create a new config builder.
    pub fn builder() -> LineConfigBuilder {
        LineConfigBuilder::default()
    }
}

/// Outcome of annotating a tree with line counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineReport {
    /// Files whose lines were counted.
    pub files_counted: u64,
    /// Files left out (binary, too large or unreadable placeholders).
    pub files_skipped: u64,
    /// Files whose content could not be read.
    pub files_failed: u64,
    /// Sum of all counted lines.
    pub total_lines: u64,
}

/// Counts lines of the files in an entry tree.
#[derive(Debug, Clone, Default)]
pub struct LineCounter {
    config: LineConfig,
}

impl LineCounter {
    /// Create a counter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a counter with the given configuration.
    pub fn with_config(config: LineConfig) -> Self {
        Self { config }
    }

    /// Check if a file entry would be counted.
    pub fn should_count(&self, entry: &Entry) -> bool {
        if !entry.is_file() || entry.is_unreadable() {
            return false;
        }
        if self.config.skip_binary && is_binary(entry.path()) {
            return false;
        }
        self.config
            .max_file_size
            .is_none_or(|limit| entry.size() <= limit)
    }

    /// Count the lines of a single file entry.
    pub async fn count_entry(&self, entry: &Entry) -> Result<u64, TreeError> {
        let blob = entry.file_handle()?;
        count_blob_lines(blob.as_ref())
            .await
            .map_err(|e| TreeError::fetch(entry.path(), e))
    }

    /// Count every eligible file below `root` and store each count in its
    /// entry's metadata under [`LINES_META_KEY`].
    ///
    /// Read failures are logged and reported, not fatal.
    pub async fn annotate(&self, root: &mut Entry) -> LineReport {
        let mut report = LineReport::default();
        let mut targets = Vec::new();
        self.collect_targets(root, &mut Vec::new(), &mut targets, &mut report);
        debug!(files = targets.len(), "counting lines");

        let results: Vec<(Target, io::Result<u64>)> = stream::iter(targets)
            .map(|target| async move {
                let result = count_blob_lines(target.blob.as_ref()).await;
                (target, result)
            })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        for (target, result) in results {
            let lines = match result {
                Ok(lines) => lines,
                Err(err) => {
                    warn!(path = %target.path, error = %err, "failed to read file for line count");
                    report.files_failed += 1;
                    continue;
                }
            };
            match entry_at_mut(root, &target.route) {
                Some(entry) => {
                    entry.set_meta(LINES_META_KEY, lines);
                    report.files_counted += 1;
                    report.total_lines += lines;
                }
                None => {
                    warn!(path = %target.path, "entry vanished before its line count was stored");
                    report.files_failed += 1;
                }
            }
        }

        report
    }

    /// Gather countable files in pre-order, remembering each one's position.
    fn collect_targets(
        &self,
        entry: &Entry,
        route: &mut Vec<usize>,
        targets: &mut Vec<Target>,
        report: &mut LineReport,
    ) {
        if let Ok(children) = entry.children() {
            for (index, child) in children.iter().enumerate() {
                route.push(index);
                self.collect_targets(child, route, targets, report);
                route.pop();
            }
            return;
        }

        if !self.should_count(entry) {
            report.files_skipped += 1;
            return;
        }
        if let Ok(blob) = entry.file_handle() {
            targets.push(Target {
                route: route.clone(),
                path: entry.path().to_string(),
                blob: Arc::clone(blob),
            });
        }
    }
}

/// A file queued for counting.
struct Target {
    /// Child indices leading from the annotated root to the file.
    route: Vec<usize>,
    path: String,
    blob: Arc<dyn Blob>,
}

fn entry_at_mut<'a>(mut entry: &'a mut Entry, route: &[usize]) -> Option<&'a mut Entry> {
    for &index in route {
        entry = entry.children_mut().ok()?.get_mut(index)?;
    }
    Some(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_lines_examples() {
        assert_eq!(count_lines(&[]), 0);
        assert_eq!(count_lines(&[0x41]), 1);
        assert_eq!(count_lines(&[0x41, 0x0A]), 1);
        assert_eq!(count_lines(&[0x41, 0x0A, 0x42]), 2);
        assert_eq!(count_lines(&[0x0A, 0x0A]), 2);
        assert_eq!(count_lines(b"\n"), 1);
    }

    #[test]
    fn test_terminating_unterminated_buffer_keeps_count() {
        for sample in [&b"a"[..], &b"a\nb"[..], &b"one\ntwo\nthree"[..], &b"\n\nx"[..]] {
            let mut terminated = sample.to_vec();
            terminated.push(b'\n');
            assert_eq!(count_lines(sample), count_lines(&terminated));
        }
    }

    #[test]
    fn test_carriage_returns() {
        assert_eq!(count_lines(b"a\r\nb\r\n"), 2);
        assert_eq!(count_lines(b"a\rb\rc"), 1);
    }

    #[test]
    fn test_non_utf8_content() {
        assert_eq!(count_lines(&[0xFF, 0xFE, 0x0A, 0x00, 0x80]), 2);
    }

    #[test]
    fn test_line_config_builder() {
        let config = LineConfig::builder()
            .skip_binary(false)
            .max_file_size(1024u64)
            .build()
            .unwrap();
        assert!(!config.skip_binary);
        assert_eq!(config.max_file_size, Some(1024));
        assert_eq!(config.max_concurrency, 16);
    }
}
