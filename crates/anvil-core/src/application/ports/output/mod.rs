//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `anvil-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{FileMergeRecord, GenerationWarning, PackageManager, RelativePath};
use crate::error::AnvilResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `anvil_adapters::filesystem::LocalFilesystem` (production)
/// - `anvil_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths are absolute. Failures are reported as
/// `ApplicationError::FilesystemError` naming the offending path.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole file.
    fn read_file(&self, path: &Path) -> AnvilResult<Vec<u8>>;

    /// Write a whole file, replacing any existing content. The parent
    /// directory must exist.
    fn write_file(&self, path: &Path, content: &[u8]) -> AnvilResult<()>;

    /// Copy one file. The parent of `to` must exist.
    fn copy_file(&self, from: &Path, to: &Path) -> AnvilResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> AnvilResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> AnvilResult<()>;

    /// Move a directory. May fail across filesystems. Whether an existing
    /// `to` is an error is platform dependent, so callers check first.
    fn rename(&self, from: &Path, to: &Path) -> AnvilResult<()>;

    /// Every regular file below `dir`, relative to `dir`, sorted.
    fn list_files(&self, dir: &Path) -> AnvilResult<Vec<RelativePath>>;

    /// Immediate subdirectory names of `dir`, sorted.
    fn list_dirs(&self, dir: &Path) -> AnvilResult<Vec<String>>;
}

/// Receives generation progress as it happens.
///
/// Every method has a no-op default so observers implement only what they
/// display.
#[allow(unused_variables)]
pub trait GenerationObserver: Send + Sync {
    /// An addon template was found and is about to be integrated.
    fn addon_started(&self, addon: &str, root: &Path) {}

    /// One addon file was handled.
    fn file_integrated(&self, record: &FileMergeRecord) {}

    /// A non-fatal problem was recorded.
    fn warning(&self, warning: &GenerationWarning) {}

    /// The staged project was moved to its destination.
    fn promoted(&self, destination: &Path) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

/// Port for the post-generation dependency install.
pub trait PackageInstaller: Send + Sync {
    /// Install dependencies of the project at `project_dir`, blocking until done.
    fn install(&self, project_dir: &Path, manager: PackageManager) -> AnvilResult<()>;
}
