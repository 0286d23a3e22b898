//! Build progress reporting.

use std::time::Duration;

/// Progress information during a build.
#[derive(Debug, Clone, Default)]
pub struct BuildProgress {
    /// Number of files fetched so far.
    pub files_seen: u64,
    /// Number of directories enumerated so far.
    pub dirs_seen: u64,
    /// Total bytes of fetched files so far.
    pub bytes_seen: u64,
    /// Path most recently visited.
    pub current_path: String,
    /// Number of warnings recorded.
    pub warnings_count: u64,
    /// Time elapsed since the build started.
    pub elapsed: Duration,
    /// Whether this is the final update of the build.
    pub finished: bool,
}

impl BuildProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate build rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_seen as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get total items seen (files + dirs).
    pub fn total_items(&self) -> u64 {
        self.files_seen + self.dirs_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let progress = BuildProgress {
            files_seen: 10,
            dirs_seen: 2,
            elapsed: Duration::from_secs(2),
            ..BuildProgress::new()
        };
        assert_eq!(progress.files_per_second(), 5.0);
        assert_eq!(progress.total_items(), 12);
        assert_eq!(BuildProgress::new().files_per_second(), 0.0);
    }
}
