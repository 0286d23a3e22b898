//! Extension-based binary file classification.

/// Extensions (lower case, with leading dot) treated as binary.
pub const BINARY_EXTENSIONS: &[&str] = &[
    ".bmp", ".ico", ".png", ".jpg", ".jpeg", ".webp", ".avif", ".jfif", ".tiff", ".xd", ".a",
    ".xz", ".gz", ".tar", ".zip", ".rar", ".7z", ".cbz", ".cbr", ".cb7", ".exe", ".dll", ".pdb",
    ".lib", ".ttf", ".otf", ".afm",
];

/// Lower-cased final extension with its leading dot, or `""` if there is none.
///
/// `"foo.TXT"` gives `".txt"`, `"foo"` gives `""`.
pub fn file_ext(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

/// Check if a path is known not to be text.
///
/// Anything inside a `.git` directory counts as binary.
pub fn is_binary(path: &str) -> bool {
    if path.contains(".git/") {
        return true;
    }
    let ext = file_ext(path);
    BINARY_EXTENSIONS.contains(&ext.as_str())
}
