//! Tree build configuration types.

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// What to do when a file's content cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorPolicy {
    /// Fail the whole build.
    #[default]
    Abort,
    /// Substitute an unreadable placeholder entry and record a warning.
    Placeholder,
}

/// Configuration for tree builds.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct BuildConfig {
    /// Glob patterns matched against child names and paths; matches are skipped.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Include hidden entries (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Maximum in-flight child operations per directory.
    #[builder(default = "16")]
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Policy for files whose content cannot be fetched.
    #[builder(default)]
    #[serde(default)]
    pub on_fetch_error: FetchErrorPolicy,
}

fn default_true() -> bool {
    true
}

fn default_max_concurrency() -> usize {
    16
}

impl BuildConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == Some(0) {
            return Err("max_concurrency must be greater than zero".to_string());
        }
        if let Some(ref patterns) = self.ignore_patterns {
            for pattern in patterns {
                Glob::new(pattern).map_err(|e| format!("Invalid ignore pattern: {e}"))?;
            }
        }
        Ok(())
    }
}

impl BuildConfig {
    /// Create a new build config builder.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }

    /// Compile the ignore patterns into a matcher.
    pub fn ignore_set(&self) -> Result<GlobSet, TreeError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore_patterns {
            let glob = Glob::new(pattern).map_err(|e| TreeError::InvalidConfig {
                message: format!("Invalid ignore pattern: {e}"),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| TreeError::InvalidConfig {
            message: e.to_string(),
        })
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            include_hidden: true,
            max_concurrency: default_max_concurrency(),
            on_fetch_error: FetchErrorPolicy::Abort,
        }
    }
}
