use fstree_analyze::{
    LINES_META_KEY, LineConfig, LineCounter, LineReport, count_blob_lines, is_binary,
};
use fstree_core::{BuildConfig, Entry, FetchErrorPolicy, TreeError};
use fstree_scan::{MemoryBlob, MemoryDir, NeverSkip, TreeBuilder, build_tree};
use serde_json::json;

fn project() -> MemoryDir {
    MemoryDir::new("project")
        .file("readme.md", "# project\n\nintro")
        .file("empty.txt", "")
        .file("logo.png", vec![0x89, b'P', b'N', b'G', b'\n', b'\n'])
        .dir(
            MemoryDir::new("src")
                .file("main.rs", "fn main() {\r\n}\r\n")
                .file("big.rs", "a\n".repeat(100)),
        )
}

#[tokio::test]
async fn test_count_blob_lines() {
    let blob = MemoryBlob::new("a.txt", "one\ntwo");
    assert_eq!(count_blob_lines(&blob).await.unwrap(), 2);

    let empty = MemoryBlob::new("empty", "");
    assert_eq!(count_blob_lines(&empty).await.unwrap(), 0);
}

#[tokio::test]
async fn test_annotate_tree() {
    let mut root = TreeBuilder::new()
        .build(project().into_handle())
        .await
        .unwrap()
        .root;

    let report = LineCounter::new().annotate(&mut root).await;
    assert_eq!(
        report,
        LineReport {
            files_counted: 4,
            files_skipped: 1,
            files_failed: 0,
            total_lines: 3 + 0 + 2 + 100,
        }
    );

    let lines = |path: &str| root.find(path).unwrap().get_meta(LINES_META_KEY).cloned();
    assert_eq!(lines("readme.md"), Some(json!(3)));
    assert_eq!(lines("empty.txt"), Some(json!(0)));
    assert_eq!(lines("src/main.rs"), Some(json!(2)));
    assert_eq!(lines("logo.png"), None);
    assert!(root.get_meta(LINES_META_KEY).is_none());
}

#[tokio::test]
async fn test_annotate_respects_config() {
    let mut root = TreeBuilder::new()
        .build(project().into_handle())
        .await
        .unwrap()
        .root;
    let config = LineConfig::builder()
        .skip_binary(false)
        .max_file_size(50u64)
        .build()
        .unwrap();

    let report = LineCounter::with_config(config).annotate(&mut root).await;
    assert_eq!(report.files_counted, 4);
    assert_eq!(report.files_skipped, 1);
    assert_eq!(root.find("logo.png").unwrap().get_meta(LINES_META_KEY), Some(&json!(2)));
    assert!(root.find("src/big.rs").unwrap().get_meta(LINES_META_KEY).is_none());
}

#[tokio::test]
async fn test_unreadable_files_are_skipped() {
    let dir = MemoryDir::new("root")
        .file("a.txt", "a")
        .unreadable_file("b.txt");
    let config = BuildConfig::builder()
        .on_fetch_error(FetchErrorPolicy::Placeholder)
        .build()
        .unwrap();
    let mut root = TreeBuilder::with_config(config)
        .build(dir.into_handle())
        .await
        .unwrap()
        .root;

    let counter = LineCounter::new();
    let report = counter.annotate(&mut root).await;
    assert_eq!(report.files_counted, 1);
    assert_eq!(report.files_skipped, 1);

    let unreadable = root.find("b.txt").unwrap();
    assert!(matches!(
        counter.count_entry(unreadable).await,
        Err(TreeError::Unreadable { .. })
    ));
    assert!(matches!(
        counter.count_entry(&root).await,
        Err(TreeError::TypeMismatch { .. })
    ));
}

#[tokio::test]
async fn test_read_failures_do_not_abort_annotation() {
    let dir = MemoryDir::new("root")
        .file("a.txt", "one\ntwo\n")
        .corrupt_file("broken.txt", "lost\n")
        .dir(MemoryDir::new("src").file("lib.rs", "x"));
    let mut root = TreeBuilder::new()
        .build(dir.into_handle())
        .await
        .unwrap()
        .root;

    let report = LineCounter::new().annotate(&mut root).await;
    assert_eq!(
        report,
        LineReport {
            files_counted: 2,
            files_skipped: 0,
            files_failed: 1,
            total_lines: 3,
        }
    );
    assert!(!root.find("broken.txt").unwrap().has_meta(LINES_META_KEY));
    assert!(root.find("src/lib.rs").unwrap().has_meta(LINES_META_KEY));
}

#[tokio::test]
async fn test_annotate_reparented_subtree() {
    let sub = MemoryDir::new("sub")
        .file("notes.txt", "a\nb\n")
        .dir(MemoryDir::new("deep").file("more.txt", "c"));
    let mut subtree = build_tree(sub.into_handle(), NeverSkip, Some(""))
        .await
        .unwrap();
    subtree.set_path("sub");

    let mut root = Entry::root(MemoryDir::new("root").into_handle());
    root.children_mut().unwrap().push(subtree);

    let report = LineCounter::new().annotate(&mut root).await;
    let annotated = root
        .files()
        .filter(|file| file.has_meta(LINES_META_KEY))
        .count() as u64;

    assert_eq!(report.files_counted, 2);
    assert_eq!(report.files_counted, annotated);
    assert_eq!(report.total_lines, 3);
}

#[test]
fn test_binary_classification_of_paths() {
    assert!(is_binary("fonts/Inter.TTF"));
    assert!(is_binary(".git/objects/ab/cdef"));
    assert!(!is_binary("docs/guide.md"));
}
