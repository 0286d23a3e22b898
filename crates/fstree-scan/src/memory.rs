//! In-memory host capabilities.
//!
//! Useful for building trees from synthetic data and for exercising the
//! builder without touching a real filesystem.

use std::io;
use std::sync::Arc;

use futures::future::BoxFuture;

use fstree_core::{Blob, ChildHandle, DirectoryHandle, FileHandle};

/// File content held in memory.
#[derive(Debug, Clone)]
pub struct MemoryBlob {
    name: String,
    content: Arc<[u8]>,
    fail: Option<io::ErrorKind>,
}

impl MemoryBlob {
    /// Create a blob from bytes.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let content: Vec<u8> = content.into();
        Self {
            name: name.into(),
            content: Arc::from(content),
            fail: None,
        }
    }

    /// Create a blob that reports `content`'s size but fails to read with `kind`.
    pub fn failing(
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
        kind: io::ErrorKind,
    ) -> Self {
        Self {
            fail: Some(kind),
            ..Self::new(name, content)
        }
    }
}

impl Blob for MemoryBlob {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.content.len() as u64
    }

    fn bytes(&self) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        Box::pin(async move {
            match self.fail {
                Some(kind) => Err(io::Error::new(kind, format!("cannot read {}", self.name))),
                None => Ok(self.content.to_vec()),
            }
        })
    }
}

/// A file child of a [`MemoryDir`].
#[derive(Debug, Clone)]
pub struct MemoryFile {
    blob: MemoryBlob,
    fail: Option<io::ErrorKind>,
}

impl MemoryFile {
    /// Create a readable file.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            blob: MemoryBlob::new(name, content),
            fail: None,
        }
    }

    /// Create a file whose content fetch fails with `kind`.
    pub fn failing(name: impl Into<String>, kind: io::ErrorKind) -> Self {
        Self {
            blob: MemoryBlob::new(name, Vec::new()),
            fail: Some(kind),
        }
    }
}

impl FileHandle for MemoryFile {
    fn name(&self) -> &str {
        &self.blob.name
    }

    fn get_file(&self) -> BoxFuture<'_, io::Result<Arc<dyn Blob>>> {
        Box::pin(async move {
            match self.fail {
                Some(kind) => Err(io::Error::new(kind, format!("cannot read {}", self.blob.name))),
                None => Ok(Arc::new(self.blob.clone()) as Arc<dyn Blob>),
            }
        })
    }
}

/// A directory held in memory. Children are enumerated in insertion order.
#[derive(Debug, Clone)]
pub struct MemoryDir {
    name: String,
    children: Vec<ChildHandle>,
    fail: Option<io::ErrorKind>,
}

impl MemoryDir {
    /// Create an empty directory.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            fail: None,
        }
    }

    /// Add a file child.
    pub fn file(self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.child(MemoryFile::new(name, content))
    }

    /// Add a file child whose content cannot be fetched.
    pub fn unreadable_file(self, name: impl Into<String>) -> Self {
        self.child(MemoryFile::failing(name, io::ErrorKind::PermissionDenied))
    }

    /// Add a file child that can be fetched but whose bytes cannot be read.
    pub fn corrupt_file(self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.child(MemoryFile {
            blob: MemoryBlob::failing(name, content, io::ErrorKind::InvalidData),
            fail: None,
        })
    }

    /// Add a directory child.
    pub fn dir(mut self, dir: MemoryDir) -> Self {
        self.children.push(ChildHandle::Directory(Arc::new(dir)));
        self
    }

    /// Make enumeration of this directory fail as if permission was revoked.
    pub fn denied(mut self) -> Self {
        self.fail = Some(io::ErrorKind::PermissionDenied);
        self
    }

    /// Wrap into a shared directory capability.
    pub fn into_handle(self) -> Arc<dyn DirectoryHandle> {
        Arc::new(self)
    }

    fn child(mut self, file: MemoryFile) -> Self {
        self.children.push(ChildHandle::File(Arc::new(file)));
        self
    }
}

impl DirectoryHandle for MemoryDir {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> BoxFuture<'_, io::Result<Vec<ChildHandle>>> {
        Box::pin(async move {
            match self.fail {
                Some(kind) => Err(io::Error::new(kind, format!("cannot list {}", self.name))),
                None => Ok(self.children.clone()),
            }
        })
    }
}
