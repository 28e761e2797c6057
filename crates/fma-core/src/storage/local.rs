use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::trace;
use tempfile::NamedTempFile;

use crate::kernel::error::{Error, Result};
use crate::storage::error::StorageSystemError;
use crate::storage::provider::StorageProvider;

/// Local filesystem storage rooted at a base directory
#[derive(Clone)]
pub struct LocalStorageProvider {
    base_path: PathBuf,
    readonly: bool,
}

impl LocalStorageProvider {
    /// Create a new local storage provider with the given base path
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            readonly: false,
        }
    }

    /// A provider refusing every write
    pub fn read_only(base_path: PathBuf) -> Self {
        Self {
            base_path,
            readonly: true,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.base_path.join(path)
    }

    fn check_writable(&self, full_path: &Path) -> Result<()> {
        if self.readonly {
            return Err(StorageSystemError::ReadOnly(full_path.to_path_buf()).into());
        }
        Ok(())
    }
}

impl StorageProvider for LocalStorageProvider {
    fn name(&self) -> &str {
        "local"
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.resolve_path(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve_path(path).exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve_path(path).is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve_path(path).is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve_path(path);
        self.check_writable(&full_path)?;
        fs::create_dir_all(&full_path).map_err(|e| Error::io(e, "create_dir_all", full_path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve_path(path);
        if !full_path.exists() {
            return Err(StorageSystemError::FileNotFound(full_path).into());
        }
        fs::read_to_string(&full_path).map_err(|e| Error::io(e, "read_to_string", full_path))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<()> {
        self.write_bytes(path, contents.as_bytes())
    }

    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let full_path = self.resolve_path(path);
        self.check_writable(&full_path)?;

        let Some(parent) = full_path.parent().map(Path::to_path_buf) else {
            return Err(Error::storage(
                "write_bytes",
                Some(full_path),
                "Cannot write to path without parent directory",
            ));
        };
        if !parent.is_dir() {
            fs::create_dir_all(&parent).map_err(|e| Error::io(e, "create_dir_all", parent.clone()))?;
        }

        // Write next to the target, then rename over it.
        let mut temp_file =
            NamedTempFile::new_in(&parent).map_err(|e| Error::io(e, "create_temp_file", parent.clone()))?;
        temp_file
            .write_all(contents)
            .map_err(|e| Error::io(e, "write_to_temp_file", temp_file.path().to_path_buf()))?;
        temp_file
            .persist(&full_path)
            .map_err(|e| Error::io(e.error, "persist_temp_file", full_path.clone()))?;

        trace!("wrote {} bytes to {}", contents.len(), full_path.display());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let full_path = self.resolve_path(path);
        self.check_writable(&full_path)?;
        fs::remove_file(&full_path).map_err(|e| Error::io(e, "remove_file", full_path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let full_path = self.resolve_path(path);
        let entries = fs::read_dir(&full_path).map_err(|e| Error::io(e, "read_dir", full_path.clone()))?;
        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(e, "read_dir_entry", full_path.clone()))?;
            let path = entry.path();
            match path.strip_prefix(&self.base_path) {
                Ok(relative) => result.push(relative.to_path_buf()),
                Err(_) => result.push(path),
            }
        }
        // Directory order is unspecified; callers want a stable listing.
        result.sort();
        Ok(result)
    }

    fn is_writable(&self, path: &Path) -> bool {
        if self.readonly {
            return false;
        }
        let full_path = self.resolve_path(path);
        match fs::metadata(&full_path) {
            Ok(metadata) => !metadata.permissions().readonly(),
            Err(_) => true,
        }
    }
}

impl fmt::Debug for LocalStorageProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStorageProvider")
            .field("base_path", &self.base_path)
            .field("readonly", &self.readonly)
            .finish()
    }
}
