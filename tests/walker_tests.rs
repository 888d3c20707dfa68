mod common;

use common::touch_under;
use gdfid_finder::walker::default_priority_dirs;
use gdfid_finder::{FilesystemWalker, LibcXattrReader, XattrCrateReader, DRIVEFS_ITEM_ID_ATTR};
use std::path::Path;
use tempfile::TempDir;

/// Tags `path` with a real extended attribute. Returns false where the
/// filesystem refuses user attributes, so callers can skip.
fn tag(path: &Path, id: &str) -> bool {
    xattr::set(path, DRIVEFS_ITEM_ID_ATTR, id.as_bytes()).is_ok()
}

fn libc_walker() -> FilesystemWalker<LibcXattrReader> {
    let reader = LibcXattrReader::new(DRIVEFS_ITEM_ID_ATTR).expect("attribute name is valid");
    FilesystemWalker::new(reader, default_priority_dirs())
}

#[test]
fn test_finds_tagged_file_with_libc_reader() {
    let temp = TempDir::new().unwrap();
    let mount = temp.path().join("GoogleDrive-a@example.com");
    let target = touch_under(&mount, "My Drive/Projects/report.pdf");
    touch_under(&mount, "My Drive/Projects/other.pdf");
    if !tag(&target, "1REALXATTR") {
        eprintln!("Skipping: user extended attributes unsupported here");
        return;
    }

    assert_eq!(libc_walker().search(&mount, "1REALXATTR"), Some(target));
}

#[test]
fn test_both_readers_agree() {
    let temp = TempDir::new().unwrap();
    let mount = temp.path().join("GoogleDrive-a@example.com");
    let target = touch_under(&mount, "Shared drives/Team/notes.md");
    if !tag(&target, "1AGREE") {
        eprintln!("Skipping: user extended attributes unsupported here");
        return;
    }

    let portable = FilesystemWalker::new(
        XattrCrateReader::new(DRIVEFS_ITEM_ID_ATTR),
        default_priority_dirs(),
    );
    assert_eq!(portable.search(&mount, "1AGREE"), Some(target.clone()));
    assert_eq!(libc_walker().search(&mount, "1AGREE"), Some(target));
}

#[test]
fn test_prefix_of_stored_value_does_not_match() {
    let temp = TempDir::new().unwrap();
    let mount = temp.path().join("GoogleDrive-a@example.com");
    let target = touch_under(&mount, "My Drive/a.txt");
    if !tag(&target, "1ABCDEF") {
        eprintln!("Skipping: user extended attributes unsupported here");
        return;
    }

    let walker = libc_walker();
    assert_eq!(walker.search(&mount, "1ABC"), None);
    assert_eq!(walker.search(&mount, "1ABCDEFG"), None);
    assert_eq!(walker.search(&mount, "1ABCDEF"), Some(target));
}

#[test]
fn test_tagged_mount_root_is_returned() {
    let temp = TempDir::new().unwrap();
    let mount = temp.path().join("GoogleDrive-a@example.com");
    touch_under(&mount, "My Drive/a.txt");
    if !tag(&mount, "0AMOUNT") {
        eprintln!("Skipping: user extended attributes unsupported here");
        return;
    }

    assert_eq!(libc_walker().search(&mount, "0AMOUNT"), Some(mount));
}

#[test]
fn test_hidden_tagged_entry_is_never_found() {
    let temp = TempDir::new().unwrap();
    let mount = temp.path().join("GoogleDrive-a@example.com");
    let hidden = touch_under(&mount, "My Drive/.cache/secret.txt");
    if !tag(&hidden, "1HIDDEN") {
        eprintln!("Skipping: user extended attributes unsupported here");
        return;
    }

    assert_eq!(libc_walker().search(&mount, "1HIDDEN"), None);
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_terminates_and_still_finds_target() {
    let temp = TempDir::new().unwrap();
    let mount = temp.path().join("GoogleDrive-a@example.com");
    let loop_dir = touch_under(&mount, "My Drive/loop");
    std::os::unix::fs::symlink(&loop_dir, loop_dir.join("again")).unwrap();
    std::os::unix::fs::symlink(&mount, loop_dir.join("up")).unwrap();
    let target = touch_under(&mount, "Other/z.txt");
    if !tag(&target, "1BEYONDLOOP") {
        eprintln!("Skipping: user extended attributes unsupported here");
        return;
    }

    assert_eq!(libc_walker().search(&mount, "1BEYONDLOOP"), Some(target));
    assert_eq!(libc_walker().search(&mount, "1NOWHERE"), None);
}

#[test]
fn test_untagged_tree_is_not_found() {
    let temp = TempDir::new().unwrap();
    let mount = temp.path().join("GoogleDrive-a@example.com");
    touch_under(&mount, "My Drive/a/b/c.txt");
    touch_under(&mount, "Shared drives/d.txt");

    assert_eq!(libc_walker().search(&mount, "1MISSING"), None);
}
