//! Tests for RealFileSystem

use std::thread;
use std::time::Duration;

use crate::services::file_system::RealFileSystem;
use crate::traits::FileSystem;

#[test]
fn test_write_creates_parents_and_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let fs = RealFileSystem::new();
    let path = dir.path().join("etc/services/app.properties");

    fs.write_file(&path, "key=value\n", 0o644).unwrap();

    assert!(path.exists());
    assert_eq!(fs.read_to_string(&path).unwrap(), "key=value\n");
}

#[cfg(unix)]
#[test]
fn test_write_applies_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let fs = RealFileSystem::new();
    let path = dir.path().join("sudoers");

    fs.write_file(&path, "x", 0o600).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_remove_missing_file_is_ok() {
    let dir = tempfile::tempdir().unwrap();
    let fs = RealFileSystem::new();
    let path = dir.path().join("absent.cfg");

    assert!(fs.remove_file(&path).is_ok());

    fs.write_file(&path, "x", 0o644).unwrap();
    fs.remove_file(&path).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_newest_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    let fs = RealFileSystem::new();

    assert_eq!(fs.newest_subdirectory(dir.path()).unwrap(), None);

    fs.create_dir_all(&dir.path().join("20240101000000")).unwrap();
    thread::sleep(Duration::from_millis(50));
    fs.create_dir_all(&dir.path().join("20240102000000")).unwrap();
    // Plain files are ignored
    fs.write_file(&dir.path().join("notes.txt"), "x", 0o644).unwrap();

    let newest = fs.newest_subdirectory(dir.path()).unwrap().unwrap();
    assert_eq!(newest.file_name().unwrap(), "20240102000000");
}

#[test]
fn test_newest_subdirectory_missing_root_errors() {
    let dir = tempfile::tempdir().unwrap();
    let fs = RealFileSystem::new();
    assert!(fs.newest_subdirectory(&dir.path().join("releases")).is_err());
}
