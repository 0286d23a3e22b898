//! Core types and traits for fstree.
//!
//! This crate provides the in-memory directory tree model used throughout
//! the fstree ecosystem: the [`Entry`] sum type with its lazily allocated
//! metadata slot, the host capability traits a tree is built from, error
//! types, and build configuration.

mod config;
mod error;
mod handle;
mod node;
mod tree;

pub use config::{BuildConfig, BuildConfigBuilder, BuildConfigBuilderError, FetchErrorPolicy};
pub use error::{BuildWarning, EntryShape, TreeError, WarningKind};
pub use handle::{Blob, ChildHandle, DirectoryHandle, FileHandle};
pub use node::{Entry, EntryKind, Metadata};
pub use tree::{TreeStats, Walk};

/// Arbitrary value stored in an entry's metadata slot.
pub use serde_json::Value as MetaValue;
