//! File and directory entry types.

use std::sync::Arc;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{EntryShape, TreeError};
use crate::handle::{Blob, DirectoryHandle};

/// Caller-attached key-value data on a single entry.
pub type Metadata = IndexMap<String, Value>;

/// Shape of an entry and the host handles it references.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// Regular file.
    File {
        /// Content handle; `None` for a placeholder whose fetch failed.
        #[serde(skip)]
        blob: Option<Arc<dyn Blob>>,
    },
    /// Directory.
    Directory {
        /// Children in host enumeration order.
        children: Vec<Entry>,
        /// Directory capability this node was built from.
        #[serde(skip)]
        handle: Arc<dyn DirectoryHandle>,
    },
}

impl EntryKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory { .. })
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File { .. })
    }

    /// The discriminant of this kind.
    pub fn shape(&self) -> EntryShape {
        match self {
            EntryKind::File { .. } => EntryShape::File,
            EntryKind::Directory { .. } => EntryShape::Directory,
        }
    }
}

/// A single file or directory in the tree.
///
/// Structure is fixed once built. Only the size and the metadata slot may be
/// changed afterwards, plus the path when a node is re-parented.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    name: CompactString,
    path: String,
    size: u64,
    #[serde(flatten)]
    kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Metadata>,
}

impl Entry {
    /// Create a file entry. Size is taken from the content handle.
    pub fn file(
        name: impl Into<CompactString>,
        path: impl Into<String>,
        blob: Arc<dyn Blob>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: blob.size(),
            kind: EntryKind::File { blob: Some(blob) },
            meta: None,
        }
    }

    /// Create a placeholder file entry for content that could not be fetched.
    pub fn unreadable(name: impl Into<CompactString>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: 0,
            kind: EntryKind::File { blob: None },
            meta: None,
        }
    }

    /// Create a directory entry with the given children.
    pub fn directory(
        handle: Arc<dyn DirectoryHandle>,
        name: impl Into<CompactString>,
        path: impl Into<String>,
        children: Vec<Entry>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size: 0,
            kind: EntryKind::Directory { children, handle },
            meta: None,
        }
    }

    /// Synthesize an empty root directory entry for a capability.
    pub fn root(handle: Arc<dyn DirectoryHandle>) -> Self {
        let name = CompactString::new(handle.name());
        Self::directory(handle, name, "", Vec::new())
    }

    /// Check if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this is a placeholder for an unreadable file.
    pub fn is_unreadable(&self) -> bool {
        matches!(self.kind, EntryKind::File { blob: None })
    }

    /// Shape and handles of this entry.
    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    /// Display name (not full path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slash-separated path relative to the traversal root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Overwrite the path, e.g. after re-parenting.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Size in bytes. Always 0 for directories built by the tree builder.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Overwrite the size.
    pub fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    /// Children of a directory entry.
    pub fn children(&self) -> Result<&[Entry], TreeError> {
        match &self.kind {
            EntryKind::Directory { children, .. } => Ok(children),
            EntryKind::File { .. } => Err(self.mismatch(EntryShape::Directory)),
        }
    }

    /// Mutable children of a directory entry.
    pub fn children_mut(&mut self) -> Result<&mut Vec<Entry>, TreeError> {
        match &mut self.kind {
            EntryKind::Directory { children, .. } => Ok(children),
            EntryKind::File { .. } => Err(TreeError::type_mismatch(
                self.path.clone(),
                EntryShape::Directory,
            )),
        }
    }

    /// Content handle of a file entry.
    pub fn file_handle(&self) -> Result<&Arc<dyn Blob>, TreeError> {
        match &self.kind {
            EntryKind::File { blob: Some(blob) } => Ok(blob),
            EntryKind::File { blob: None } => Err(TreeError::Unreadable {
                path: self.path.clone(),
            }),
            EntryKind::Directory { .. } => Err(self.mismatch(EntryShape::File)),
        }
    }

    /// Capability of a directory entry.
    pub fn dir_handle(&self) -> Result<&Arc<dyn DirectoryHandle>, TreeError> {
        match &self.kind {
            EntryKind::Directory { handle, .. } => Ok(handle),
            EntryKind::File { .. } => Err(self.mismatch(EntryShape::Directory)),
        }
    }

    /// The whole metadata mapping, if one has been allocated.
    pub fn meta(&self) -> Option<&Metadata> {
        self.meta.as_ref()
    }

    /// Look up a metadata value.
    pub fn get_meta(&self, key: &str) -> Option<&Value> {
        self.meta.as_ref().and_then(|meta| meta.get(key))
    }

    /// Check if a metadata key is present.
    pub fn has_meta(&self, key: &str) -> bool {
        self.meta.as_ref().is_some_and(|meta| meta.contains_key(key))
    }

    /// Set a metadata value, allocating the mapping on first write.
    ///
    /// Last write wins.
    pub fn set_meta(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.meta
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
    }

    /// Replace the whole metadata mapping.
    pub fn set_meta_all(&mut self, meta: Metadata) {
        self.meta = Some(meta);
    }

    fn mismatch(&self, expected: EntryShape) -> TreeError {
        TreeError::type_mismatch(self.path.clone(), expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use serde_json::json;

    use crate::handle::ChildHandle;

    #[derive(Debug)]
    struct StaticBlob(&'static [u8]);

    impl Blob for StaticBlob {
        fn name(&self) -> &str {
            "static"
        }

        fn size(&self) -> u64 {
            self.0.len() as u64
        }

        fn bytes(&self) -> BoxFuture<'_, std::io::Result<Vec<u8>>> {
            Box::pin(async move { Ok(self.0.to_vec()) })
        }
    }

    #[derive(Debug)]
    struct EmptyDir;

    impl DirectoryHandle for EmptyDir {
        fn name(&self) -> &str {
            "root"
        }

        fn entries(&self) -> BoxFuture<'_, std::io::Result<Vec<ChildHandle>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    fn file(name: &str) -> Entry {
        Entry::file(name, name, Arc::new(StaticBlob(b"abc")))
    }

    #[test]
    fn test_file_entry_creation() {
        let entry = file("a.txt");
        assert!(entry.is_file());
        assert!(!entry.is_directory());
        assert_eq!(entry.size(), 3);
        assert!(entry.file_handle().is_ok());
        assert!(matches!(
            entry.children(),
            Err(TreeError::TypeMismatch { expected: EntryShape::Directory, .. })
        ));
    }

    #[test]
    fn test_root_entry() {
        let root = Entry::root(Arc::new(EmptyDir));
        assert!(root.is_directory());
        assert_eq!(root.name(), "root");
        assert_eq!(root.path(), "");
        assert_eq!(root.size(), 0);
        assert!(root.children().unwrap().is_empty());
        assert!(matches!(
            root.file_handle(),
            Err(TreeError::TypeMismatch { expected: EntryShape::File, .. })
        ));
    }

    #[test]
    fn test_unreadable_entry() {
        let entry = Entry::unreadable("secret", "dir/secret");
        assert!(entry.is_file());
        assert!(entry.is_unreadable());
        assert!(matches!(entry.file_handle(), Err(TreeError::Unreadable { .. })));
    }

    #[test]
    fn test_meta_is_lazy() {
        let mut entry = file("a.txt");
        assert!(entry.meta().is_none());
        assert!(entry.get_meta("lines").is_none());

        entry.set_meta("lines", 12);
        assert_eq!(entry.get_meta("lines"), Some(&json!(12)));
        assert!(entry.has_meta("lines"));

        entry.set_meta("lines", 13);
        assert_eq!(entry.get_meta("lines"), Some(&json!(13)));
        assert_eq!(entry.meta().map(|m| m.len()), Some(1));
    }

    #[test]
    fn test_meta_not_shared_between_clones() {
        let mut a = file("a.txt");
        a.set_meta("k", "v");
        let mut b = a.clone();
        b.set_meta("k", "other");
        assert_eq!(a.get_meta("k"), Some(&json!("v")));
    }

    #[test]
    fn test_set_size_and_path() {
        let mut entry = file("a.txt");
        entry.set_size(99);
        entry.set_path("moved/a.txt");
        assert_eq!(entry.size(), 99);
        assert_eq!(entry.path(), "moved/a.txt");
    }

    #[test]
    fn test_serialize_skips_handles() {
        let mut root = Entry::root(Arc::new(EmptyDir));
        root.children_mut().unwrap().push(file("a.txt"));
        root.set_meta("note", "x");
        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(value["type"], "directory");
        assert_eq!(value["children"][0]["type"], "file");
        assert_eq!(value["children"][0]["size"], 3);
        assert!(value["children"][0].get("meta").is_none());
        assert_eq!(value["meta"]["note"], "x");
    }
}
