//! Host capabilities a tree is built from.
//!
//! The host environment owns directories and file contents. The core only
//! holds shared references to them and never mutates them.

use std::fmt;
use std::io;
use std::sync::Arc;

use futures::future::BoxFuture;

/// Opaque handle to a file's byte content.
pub trait Blob: Send + Sync + fmt::Debug {
    /// File name as reported by the host.
    fn name(&self) -> &str;

    /// Content length in bytes.
    fn size(&self) -> u64;

    /// Read the whole content into memory.
    fn bytes(&self) -> BoxFuture<'_, io::Result<Vec<u8>>>;
}

/// A file discovered while enumerating a directory.
pub trait FileHandle: Send + Sync + fmt::Debug {
    /// File name (not full path).
    fn name(&self) -> &str;

    /// Obtain the content handle for this file.
    fn get_file(&self) -> BoxFuture<'_, io::Result<Arc<dyn Blob>>>;
}

/// A directory that can enumerate its immediate children.
pub trait DirectoryHandle: Send + Sync + fmt::Debug {
    /// Directory name (not full path).
    fn name(&self) -> &str;

    /// Enumerate immediate children in host-defined order.
    fn entries(&self) -> BoxFuture<'_, io::Result<Vec<ChildHandle>>>;
}

/// Child descriptor yielded by [`DirectoryHandle::entries`].
#[derive(Debug, Clone)]
pub enum ChildHandle {
    /// A file child.
    File(Arc<dyn FileHandle>),
    /// A directory child, which can be queried recursively.
    Directory(Arc<dyn DirectoryHandle>),
}

impl ChildHandle {
    /// Name of the child.
    pub fn name(&self) -> &str {
        match self {
            Self::File(file) => file.name(),
            Self::Directory(dir) => dir.name(),
        }
    }

    /// Check if this child is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }
}
