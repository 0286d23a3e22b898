//! Recursive tree builder for fstree.
//!
//! This crate turns a host directory capability into an in-memory
//! [`Entry`] tree.
//!
//! # Overview
//!
//! - **Concurrent traversal**: sibling subdirectories and file fetches are
//!   awaited concurrently, and results are stitched back together in host
//!   enumeration order
//! - **Skip predicates** exclude a child and its whole subtree
//! - **Progress updates** via broadcast channels
//! - **Cancellation** via `CancellationToken`; an abandoned build discards
//!   its partial result
//!
//! # Example
//!
//! ```rust,no_run
//! use fstree_scan::{MemoryDir, TreeBuilder};
//!
//! # async fn run() -> Result<(), fstree_scan::TreeError> {
//! let root = MemoryDir::new("project")
//!     .file("readme.md", "# project\n")
//!     .dir(MemoryDir::new("src").file("main.rs", "fn main() {}\n"))
//!     .into_handle();
//!
//! let output = TreeBuilder::new().build(root).await?;
//! println!("Total files: {}", output.stats.total_files);
//! # Ok(())
//! # }
//! ```

mod builder;
mod memory;
mod permission;
mod progress;
mod skip;

pub use builder::{BuildOutput, TreeBuilder, build_tree};
pub use memory::{MemoryBlob, MemoryDir, MemoryFile};
pub use permission::{AccessMode, PermissionHandle, PermissionState, verify_permission};
pub use progress::BuildProgress;
pub use skip::{NeverSkip, PatternSkip, SkipPredicate};

// Re-export core types for convenience
pub use fstree_core::{
    Blob, BuildConfig, BuildWarning, ChildHandle, DirectoryHandle, Entry, EntryKind,
    FetchErrorPolicy, FileHandle, TreeError, TreeStats,
};
