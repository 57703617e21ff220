//! Locates base and addon templates under an injected template root.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};

use crate::{
    application::ports::Filesystem,
    domain::{
        AddonTemplate, DomainValidator as validator,
        catalog::{self, ADDONS_DIR, DEFAULT_FALLBACK_FRAMEWORK, FRAMEWORKS_DIR},
    },
    error::AnvilResult,
};

/// Maps template identifiers to directories.
///
/// Read-only: resolving never touches anything outside the template root.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    root: PathBuf,
    fallback_framework: String,
}

impl TemplateResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback_framework: DEFAULT_FALLBACK_FRAMEWORK.to_string(),
        }
    }

    /// Framework whose addon variants are used when the selected one has none.
    pub fn with_fallback_framework(mut self, framework: impl Into<String>) -> Self {
        self.fallback_framework = framework.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fallback_framework(&self) -> &str {
        &self.fallback_framework
    }

    /// Directory a base template is expected at. Existence is not checked.
    pub fn base_template_dir(&self, id: &str) -> PathBuf {
        self.root.join(FRAMEWORKS_DIR).join(id)
    }

    /// Candidate directories for `addon`, in lookup order.
    pub fn candidates(&self, addon: &str, framework: &str) -> Vec<PathBuf> {
        let addons_root = self.root.join(ADDONS_DIR);
        catalog::candidate_dirs(addon, framework, &self.fallback_framework)
            .into_iter()
            .map(|rel| addons_root.join(rel))
            .collect()
    }

    /// Find the directory for `addon` without listing its files.
    pub fn locate(&self, addon: &str, framework: &str, fs: &dyn Filesystem) -> Option<PathBuf> {
        self.candidates(addon, framework).into_iter().find(|dir| {
            let hit = fs.is_dir(dir);
            trace!(candidate = %dir.display(), hit, "Addon lookup");
            hit
        })
    }

    /// Resolve `addon` for `framework`. `Ok(None)` means no candidate exists.
    #[instrument(skip(self, fs), fields(root = %self.root.display()))]
    pub fn resolve(
        &self,
        addon: &str,
        framework: &str,
        fs: &dyn Filesystem,
    ) -> AnvilResult<Option<AddonTemplate>> {
        let Some(dir) = self.locate(addon, framework, fs) else {
            debug!("No template directory found");
            return Ok(None);
        };

        let files = fs.list_files(&dir)?;
        debug!(dir = %dir.display(), files = files.len(), "Addon resolved");

        let template = AddonTemplate::new(addon, dir, files);
        validator::validate_addon(&template)?;
        Ok(Some(template))
    }
}
