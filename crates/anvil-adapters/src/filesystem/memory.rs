//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use anvil_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::RelativePath,
    error::{AnvilError, AnvilResult},
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle for assertions
/// after boxing another into a service.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file and its parent directories (testing helper).
    pub fn insert(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> &Self {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.as_ref().to_vec());
        }
        self
    }

    /// A file's content as text (testing helper).
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let bytes = inner.files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }

    fn read(&self) -> AnvilResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> AnvilResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> AnvilError {
    AnvilError::Internal {
        message: "memory filesystem lock poisoned".into(),
    }
}

fn not_found(path: &Path, what: &str) -> AnvilError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("{what} does not exist"),
    }
    .into()
}

fn require_parent(inner: &MemoryFilesystemInner, path: &Path) -> AnvilResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) => {
            Err(not_found(path, "Parent directory"))
        }
        _ => Ok(()),
    }
}

impl Filesystem for MemoryFilesystem {
    fn read_file(&self, path: &Path) -> AnvilResult<Vec<u8>> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path, "File"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> AnvilResult<()> {
        let mut inner = self.write()?;
        require_parent(&inner, path)?;
        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        let mut inner = self.write()?;
        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| not_found(from, "File"))?;
        require_parent(&inner, to)?;
        inner.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> AnvilResult<()> {
        self.write()?.add_dirs(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> AnvilResult<()> {
        let mut inner = self.write()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(from) {
            return Err(not_found(from, "Directory"));
        }
        if inner.directories.contains(to) || inner.files.contains_key(to) {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "Destination already exists".into(),
            }
            .into());
        }

        let moved_dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for dir in moved_dirs {
            inner.directories.remove(&dir);
            if let Ok(rest) = dir.strip_prefix(from) {
                inner.directories.insert(to.join(rest));
            }
        }

        let moved_files: Vec<PathBuf> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for file in moved_files {
            if let (Some(content), Ok(rest)) = (inner.files.remove(&file), file.strip_prefix(from))
            {
                inner.files.insert(to.join(rest), content);
            }
        }

        if let Some(parent) = to.parent() {
            inner.add_dirs(parent);
        }
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> AnvilResult<Vec<RelativePath>> {
        let inner = self.read()?;
        if !inner.directories.contains(dir) {
            return Err(not_found(dir, "Directory"));
        }
        inner
            .files
            .keys()
            .filter(|p| p.starts_with(dir))
            .map(|p| RelativePath::strip_root(p, dir).map_err(AnvilError::from))
            .collect()
    }

    fn list_dirs(&self, dir: &Path) -> AnvilResult<Vec<String>> {
        let inner = self.read()?;
        if !inner.directories.contains(dir) {
            return Err(not_found(dir, "Directory"));
        }
        Ok(inner
            .directories
            .iter()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }
}
