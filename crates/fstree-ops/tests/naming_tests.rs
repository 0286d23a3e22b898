use fstree_ops::{NameError, next_unique_name, unique_child_name, validate_filename};
use fstree_scan::{MemoryDir, TreeBuilder};

#[test]
fn test_successor_names_are_valid_filenames() {
    for name in ["foo.txt", "foo-1.txt", "foo", "foo-bar.txt", "foo.tar.gz", ".env"] {
        let next = next_unique_name(name);
        assert_ne!(next, name);
        assert!(validate_filename(&next).is_ok(), "{next} should be valid");
    }
}

#[tokio::test]
async fn test_unique_child_name_avoids_siblings() {
    let root = MemoryDir::new("root")
        .file("notes.txt", "a")
        .file("notes-1.txt", "b")
        .dir(MemoryDir::new("notes-2.txt"))
        .file("other.md", "c")
        .into_handle();
    let tree = TreeBuilder::new().build(root).await.unwrap().root;

    assert_eq!(unique_child_name(&tree, "notes.txt").unwrap(), "notes-3.txt");
    assert_eq!(unique_child_name(&tree, "fresh.txt").unwrap(), "fresh.txt");
}

#[tokio::test]
async fn test_unique_child_name_on_file_fails() {
    let root = MemoryDir::new("root").file("a.txt", "a").into_handle();
    let tree = TreeBuilder::new().build(root).await.unwrap().root;
    let file = tree.find("a.txt").unwrap();

    assert!(matches!(
        unique_child_name(file, "b.txt"),
        Err(NameError::Tree(_))
    ));
}
