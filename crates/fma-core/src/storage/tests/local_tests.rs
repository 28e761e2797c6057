#![cfg(test)]

use std::path::{Path, PathBuf};

use tempfile::tempdir;

use crate::kernel::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::storage::local::LocalStorageProvider;
use crate::storage::provider::StorageProvider;

// Helper function to create PathBuf from str for tests
fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

#[test]
fn test_write_and_read_string() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("nested/dir/item.desktop"), "[Desktop Entry]\n")?;
    assert!(provider.is_file(&p("nested/dir/item.desktop")));
    assert!(provider.is_dir(&p("nested/dir")));
    assert_eq!(provider.read_to_string(&p("nested/dir/item.desktop"))?, "[Desktop Entry]\n");

    // Overwrite in place
    provider.write_string(&p("nested/dir/item.desktop"), "second")?;
    assert_eq!(provider.read_to_string(&p("nested/dir/item.desktop"))?, "second");
    Ok(())
}

#[test]
fn test_no_temp_files_left_behind() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_bytes(&p("a.json"), b"{}")?;
    provider.write_bytes(&p("a.json"), b"{\"k\": 1}")?;
    assert_eq!(provider.read_dir(Path::new(""))?, vec![p("a.json")]);
    Ok(())
}

#[test]
fn test_missing_file_is_not_found() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    let err = provider.read_to_string(&p("absent.json")).unwrap_err();
    match err {
        Error::StorageSystem(StorageSystemError::FileNotFound(path)) => {
            assert_eq!(path, temp_dir.path().join("absent.json"));
        }
        other => panic!("expected FileNotFound, got {:?}", other),
    }
}

#[test]
fn test_remove_file() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    provider.write_string(&p("test.key"), "data")?;
    assert!(provider.exists(&p("test.key")), "Data should exist after writing");
    provider.remove_file(&p("test.key"))?;
    assert!(!provider.exists(&p("test.key")), "Data should not exist after deletion");
    assert!(provider.remove_file(&p("test.key")).is_err());
    Ok(())
}

#[test]
fn test_read_dir_is_sorted_and_relative() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());

    for name in ["c.desktop", "a.desktop", "b.desktop"] {
        provider.write_string(&p("actions").join(name), "")?;
    }
    let listed = provider.read_dir(&p("actions"))?;
    assert_eq!(
        listed,
        vec![p("actions/a.desktop"), p("actions/b.desktop"), p("actions/c.desktop")]
    );
    Ok(())
}

#[test]
fn test_read_only_provider_refuses_writes() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    std::fs::write(temp_dir.path().join("existing"), "keep").expect("seed file");
    let provider = LocalStorageProvider::read_only(temp_dir.path().to_path_buf());

    assert!(!provider.is_writable(&p("existing")));
    assert!(matches!(
        provider.write_string(&p("new"), "x"),
        Err(Error::StorageSystem(StorageSystemError::ReadOnly(_)))
    ));
    assert!(provider.remove_file(&p("existing")).is_err());
    assert!(provider.create_dir_all(&p("sub")).is_err());
    assert_eq!(provider.read_to_string(&p("existing")).unwrap(), "keep");
}

#[test]
fn test_missing_path_is_writable() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let provider = LocalStorageProvider::new(temp_dir.path().to_path_buf());
    assert!(provider.is_writable(&p("not/yet/created")));
    assert_eq!(provider.resolve(&p("x")), temp_dir.path().join("x"));
}
