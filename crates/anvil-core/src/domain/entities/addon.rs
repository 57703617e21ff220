use std::path::{Path, PathBuf};

use super::common::RelativePath;

/// A resolved addon template directory and the files it contributes.
///
/// Files are relative to `root` and sorted, so integration order is
/// deterministic across platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonTemplate {
    id: String,
    root: PathBuf,
    files: Vec<RelativePath>,
}

impl AddonTemplate {
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>, mut files: Vec<RelativePath>) -> Self {
        files.sort();
        Self {
            id: id.into(),
            root: root.into(),
            files,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[RelativePath] {
        &self.files
    }

    /// Absolute path of one contributed file.
    pub fn source_of(&self, file: &RelativePath) -> PathBuf {
        self.root.join(file)
    }
}
