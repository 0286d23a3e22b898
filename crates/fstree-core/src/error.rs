//! Error types for tree construction and entry access.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two shapes an entry can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryShape {
    File,
    Directory,
}

impl fmt::Display for EntryShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// Errors that can occur while building or reading a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A file-only or directory-only accessor was used on the wrong variant.
    #[error("Expected a {expected} at '{path}'")]
    TypeMismatch { path: String, expected: EntryShape },

    /// The host denied or failed to enumerate a directory.
    #[error("Failed to enumerate directory '{path}': {source}")]
    EnumerationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File content could not be retrieved.
    #[error("Failed to fetch file '{path}': {source}")]
    FetchFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The entry is a placeholder for a file whose content could not be fetched.
    #[error("File '{path}' is unreadable")]
    Unreadable { path: String },

    /// The build was abandoned through its cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl TreeError {
    /// Create a type mismatch error for an entry at `path`.
    pub fn type_mismatch(path: impl Into<String>, expected: EntryShape) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
        }
    }

    /// Create an enumeration error with path context.
    pub fn enumeration(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::EnumerationFailed {
            path: path.into(),
            source,
        }
    }

    /// Create a fetch error with path context.
    pub fn fetch(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FetchFailed {
            path: path.into(),
            source,
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::EnumerationFailed { path, .. }
            | Self::FetchFailed { path, .. }
            | Self::Unreadable { path } => Some(path),
            Self::Cancelled | Self::InvalidConfig { .. } => None,
        }
    }
}

/// Kind of build warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// File content could not be fetched; a placeholder entry was substituted.
    Unreadable,
}

/// Non-fatal problem encountered during a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildWarning {
    /// Path where the warning occurred.
    pub path: String,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl BuildWarning {
    /// Create a new build warning.
    pub fn new(path: impl Into<String>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create an unreadable-file warning.
    pub fn unreadable(path: impl Into<String>, error: &std::io::Error) -> Self {
        Self::new(path, format!("Read error: {error}"), WarningKind::Unreadable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_error_path() {
        let err = TreeError::enumeration(
            "src/private",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.path(), Some("src/private"));
        assert!(err.to_string().contains("src/private"));
        assert!(TreeError::Cancelled.path().is_none());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = TreeError::type_mismatch("a.txt", EntryShape::Directory);
        assert_eq!(err.to_string(), "Expected a directory at 'a.txt'");
    }

    #[test]
    fn test_unreadable_warning() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "gone");
        let warning = BuildWarning::unreadable("docs/a.md", &io);
        assert_eq!(warning.kind, WarningKind::Unreadable);
        assert!(warning.message.contains("gone"));
    }
}
