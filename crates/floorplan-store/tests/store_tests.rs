use floorplan_core::{ErrorKind, StoreError};
use floorplan_store::{EntryKind, ListFilter, StorageRoot};
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, StorageRoot) {
    let temp = TempDir::new().unwrap();
    let storage = StorageRoot::new(temp.path());
    (temp, storage)
}

#[test]
fn test_list_entries_direct_children_only() {
    let (temp, storage) = setup();
    fs::create_dir_all(temp.path().join("Tower A").join("nested")).unwrap();
    fs::create_dir(temp.path().join("Annex")).unwrap();
    fs::create_dir(temp.path().join(".hidden")).unwrap();
    fs::write(temp.path().join("stray.txt"), b"x").unwrap();

    let filter = ListFilter::new().with_kind(EntryKind::Directory);
    let entries = storage.list_entries(temp.path(), &filter).unwrap();

    let names: Vec<_> = entries
        .iter()
        .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["Annex", "Tower A"]);
}

#[test]
fn test_list_entries_extension_filter() {
    let (temp, storage) = setup();
    fs::write(temp.path().join("a.pdf"), b"12345").unwrap();
    fs::write(temp.path().join("b.PDF"), b"1").unwrap();
    fs::write(temp.path().join("c.png"), b"1").unwrap();

    let filter = ListFilter::new().with_extension("pdf");
    let entries = storage.list_entries(temp.path(), &filter).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].size, 5);
    assert!(entries.iter().all(|e| e.kind == EntryKind::File));
}

#[test]
fn test_list_entries_missing_directory() {
    let (temp, storage) = setup();
    let err = storage
        .list_entries(&temp.path().join("missing"), &ListFilter::new())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}

#[test]
fn test_create_directory_refuses_existing() {
    let (temp, storage) = setup();
    let target = temp.path().join("Tower A");

    storage.create_directory(&target).unwrap();
    assert!(target.is_dir());

    let err = storage.create_directory(&target).unwrap_err();
    assert!(matches!(err, StoreError::DestinationExists { .. }));
}

#[test]
fn test_remove_entry_recursive() {
    let (temp, storage) = setup();
    let target = temp.path().join("Tower A");
    fs::create_dir_all(target.join("deep")).unwrap();
    fs::write(target.join("deep").join("plan.pdf"), b"x").unwrap();

    storage.remove_entry(&target).unwrap();
    assert!(!target.exists());
}

#[test]
fn test_remove_entry_missing_fails() {
    let (temp, storage) = setup();
    let err = storage.remove_entry(&temp.path().join("nope")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}

#[test]
fn test_move_entry_refuses_existing_destination() {
    let (temp, storage) = setup();
    let from = temp.path().join("a.pdf");
    let to = temp.path().join("b.pdf");
    fs::write(&from, b"from").unwrap();
    fs::write(&to, b"to").unwrap();

    let err = storage.move_entry(&from, &to).unwrap_err();
    assert!(matches!(err, StoreError::DestinationExists { .. }));
    assert_eq!(fs::read(&from).unwrap(), b"from");
    assert_eq!(fs::read(&to).unwrap(), b"to");
}

#[test]
fn test_move_entry_directory() {
    let (temp, storage) = setup();
    let from = temp.path().join("Old");
    let to = temp.path().join("New");
    fs::create_dir(&from).unwrap();
    fs::write(from.join("plan.pdf"), b"x").unwrap();

    storage.move_entry(&from, &to).unwrap();
    assert!(!from.exists());
    assert!(to.join("plan.pdf").is_file());
}

#[test]
fn test_copy_entry_file_does_not_overwrite() {
    let (temp, storage) = setup();
    let from = temp.path().join("source.pdf");
    let to = temp.path().join("dest.pdf");
    fs::write(&from, b"new").unwrap();
    fs::write(&to, b"original").unwrap();

    let err = storage.copy_entry(&from, &to).unwrap_err();
    assert!(matches!(err, StoreError::DestinationExists { .. }));
    assert_eq!(fs::read(&to).unwrap(), b"original");
}

#[test]
fn test_copy_entry_directory_tree() {
    let (temp, storage) = setup();
    let from = temp.path().join("external");
    fs::create_dir_all(from.join("sub")).unwrap();
    fs::write(from.join("a.pdf"), b"aaaa").unwrap();
    fs::write(from.join("sub").join("b.pdf"), b"bb").unwrap();

    let to = temp.path().join("Imported");
    let bytes = storage.copy_entry(&from, &to).unwrap();

    assert_eq!(bytes, 6);
    assert_eq!(fs::read(to.join("a.pdf")).unwrap(), b"aaaa");
    assert_eq!(fs::read(to.join("sub").join("b.pdf")).unwrap(), b"bb");
    assert!(from.join("a.pdf").exists());
}

#[test]
fn test_copy_entry_missing_source_leaves_nothing() {
    let (temp, storage) = setup();
    let to = temp.path().join("dest.pdf");

    let err = storage.copy_entry(&temp.path().join("missing.pdf"), &to).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
    assert!(!to.exists());
}

#[test]
fn test_copy_entry_into_itself_is_rejected() {
    let (temp, storage) = setup();
    let from = temp.path().join("Tower");
    fs::create_dir(&from).unwrap();

    let err = storage.copy_entry(&from, &from.join("Tower")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
    assert!(!from.join("Tower").exists());
}

#[cfg(unix)]
#[test]
fn test_copy_entry_skips_symbolic_links() {
    let (temp, storage) = setup();
    let from = temp.path().join("external");
    fs::create_dir_all(from.join("sub")).unwrap();
    fs::write(from.join("a.pdf"), b"aaaa").unwrap();
    std::os::unix::fs::symlink(&from, from.join("sub").join("loop")).unwrap();
    std::os::unix::fs::symlink(from.join("a.pdf"), from.join("link.pdf")).unwrap();

    let to = temp.path().join("Imported");
    let bytes = storage.copy_entry(&from, &to).unwrap();

    assert_eq!(bytes, 4);
    assert!(to.join("a.pdf").is_file());
    assert!(to.join("sub").is_dir());
    assert!(fs::symlink_metadata(to.join("sub").join("loop")).is_err());
    assert!(fs::symlink_metadata(to.join("link.pdf")).is_err());
}
