//! Local disk implementation of the host capabilities.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fstree_core::{Blob, ChildHandle, DirectoryHandle, FileHandle};
use futures::future::BoxFuture;

/// A directory on the local filesystem.
#[derive(Debug)]
pub struct LocalDir {
    name: String,
    path: PathBuf,
}

impl LocalDir {
    /// Open a directory, resolving it to an absolute path.
    pub fn open(path: &Path) -> io::Result<Self> {
        let path = path.canonicalize()?;
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self { name, path })
    }
}

impl DirectoryHandle for LocalDir {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&self) -> BoxFuture<'_, io::Result<Vec<ChildHandle>>> {
        Box::pin(async move {
            let mut read_dir = tokio::fs::read_dir(&self.path).await?;
            let mut children = Vec::new();
            while let Some(entry) = read_dir.next_entry().await? {
                let file_type = entry.file_type().await?;
                let name = entry.file_name().to_string_lossy().into_owned();
                let path = entry.path();
                if file_type.is_dir() {
                    children.push(ChildHandle::Directory(Arc::new(LocalDir { name, path })));
                } else if file_type.is_file() {
                    children.push(ChildHandle::File(Arc::new(LocalFile { name, path })));
                } else {
                    // Symlinks and special files are not followed.
                    tracing::debug!(path = %path.display(), "skipping non-regular entry");
                }
            }
            Ok(children)
        })
    }
}

/// A regular file on the local filesystem.
#[derive(Debug)]
pub struct LocalFile {
    name: String,
    path: PathBuf,
}

impl FileHandle for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_file(&self) -> BoxFuture<'_, io::Result<Arc<dyn Blob>>> {
        Box::pin(async move {
            let metadata = tokio::fs::metadata(&self.path).await?;
            Ok(Arc::new(LocalBlob {
                name: self.name.clone(),
                path: self.path.clone(),
                size: metadata.len(),
            }) as Arc<dyn Blob>)
        })
    }
}

/// Content of a local file, read lazily from disk.
#[derive(Debug)]
pub struct LocalBlob {
    name: String,
    path: PathBuf,
    size: u64,
}

impl Blob for LocalBlob {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn bytes(&self) -> BoxFuture<'_, io::Result<Vec<u8>>> {
        Box::pin(tokio::fs::read(&self.path))
    }
}
