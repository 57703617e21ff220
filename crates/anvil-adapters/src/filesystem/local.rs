//! Local filesystem adapter using std::fs and walkdir.

use std::io;
use std::path::Path;

use anvil_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::RelativePath,
    error::{AnvilError, AnvilResult},
};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read_file(&self, path: &Path) -> AnvilResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> AnvilResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(to, e, &format!("copy {}", from.display())))
    }

    fn create_dir_all(&self, path: &Path) -> AnvilResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_dir_all(&self, path: &Path) -> AnvilResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn rename(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        std::fs::rename(from, to)
            .map_err(|e| map_io_error(to, e, &format!("move {}", from.display())))
    }

    fn list_files(&self, dir: &Path) -> AnvilResult<Vec<RelativePath>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to walk directory: {e}"),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            files.push(RelativePath::strip_root(entry.path(), dir)?);
        }
        files.sort();
        Ok(files)
    }

    fn list_dirs(&self, dir: &Path) -> AnvilResult<Vec<String>> {
        let entries = std::fs::read_dir(dir).map_err(|e| map_io_error(dir, e, "list directory"))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(dir, e, "list directory"))?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> AnvilError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
