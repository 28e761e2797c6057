use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::kernel::error::Result;

/// Filesystem-like medium the backends persist items to.
///
/// Paths are relative to the provider's root.
pub trait StorageProvider: Send + Sync + Debug {
    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Absolute location of a relative path, for messages
    fn resolve(&self, path: &Path) -> PathBuf;

    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all its parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace a file's content atomically
    fn write_string(&self, path: &Path, contents: &str) -> Result<()>;

    /// Replace a file's content atomically
    fn write_bytes(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    /// List the entries of a directory, as paths relative to the root
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Whether the medium accepts writes at this path
    fn is_writable(&self, path: &Path) -> bool;
}
