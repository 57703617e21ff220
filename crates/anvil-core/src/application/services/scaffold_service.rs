//! Scaffold Service - main application orchestrator.
//!
//! This service coordinates one generation run:
//! 1. Copy the base template into a private staging directory
//! 2. Apply each addon in selection order
//! 3. Substitute `{{PLACEHOLDER}}` tokens
//! 4. Promote the staging directory to the destination in one rename
//!
//! Any fatal error discards the staging directory, so the destination either
//! appears complete or not at all.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, GenerationObserver, NoopObserver},
        services::{dispatcher::FileMergeDispatcher, template_resolver::TemplateResolver},
    },
    domain::{
        DomainValidator as validator, GenerationReport, GenerationWarning, MergeOutcome,
        RelativePath, RenderContext, StackSelection,
    },
    error::AnvilResult,
};

/// Where each part of a selection would come from, without generating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    pub base_template: String,
    pub base_dir: PathBuf,
    pub base_exists: bool,
    pub framework: String,
    /// Addon ids in application order, with the directory each resolves to.
    pub addons: Vec<(String, Option<PathBuf>)>,
    pub destination: PathBuf,
    pub destination_exists: bool,
}

impl GenerationPlan {
    /// Addons that would be skipped.
    pub fn missing_addons(&self) -> impl Iterator<Item = &str> {
        self.addons
            .iter()
            .filter(|(_, dir)| dir.is_none())
            .map(|(id, _)| id.as_str())
    }
}

/// Main scaffolding service.
pub struct ScaffoldService {
    resolver: TemplateResolver,
    filesystem: Box<dyn Filesystem>,
    observer: Box<dyn GenerationObserver>,
}

impl ScaffoldService {
    /// Create a service reading templates from `template_root`.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use anvil_core::application::ScaffoldService;
    ///
    /// let service = ScaffoldService::new("/opt/anvil/templates", Box::new(filesystem));
    /// let report = service.generate(&selection)?;
    /// ```
    pub fn new(template_root: impl Into<PathBuf>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            resolver: TemplateResolver::new(template_root),
            filesystem,
            observer: Box::new(NoopObserver),
        }
    }

    /// Receive per-file progress while generating.
    pub fn with_observer(mut self, observer: Box<dyn GenerationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_fallback_framework(mut self, framework: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_fallback_framework(framework);
        self
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Resolve every part of `selection` without touching the destination.
    #[instrument(skip_all, fields(selection = %selection))]
    pub fn plan(&self, selection: &StackSelection) -> AnvilResult<GenerationPlan> {
        validator::validate_selection(selection)?;
        let fs = self.filesystem.as_ref();
        let framework = selection.framework().to_string();
        let base_dir = self.resolver.base_template_dir(selection.base_template());

        let addons = selection
            .addons()
            .iter()
            .map(|id| (id.clone(), self.resolver.locate(id, &framework, fs)))
            .collect();

        Ok(GenerationPlan {
            base_template: selection.base_template().to_string(),
            base_exists: fs.is_dir(&base_dir),
            base_dir,
            framework,
            addons,
            destination: selection.destination().to_path_buf(),
            destination_exists: fs.exists(selection.destination()),
        })
    }

    /// Generate the project described by `selection`.
    ///
    /// Fails with `ProjectExists` if the destination is already present.
    /// Addons without a template directory are skipped with a warning;
    /// any other error aborts the run and leaves no destination behind.
    #[instrument(
        skip_all,
        fields(
            selection = %selection,
            destination = %selection.destination().display()
        )
    )]
    pub fn generate(&self, selection: &StackSelection) -> AnvilResult<GenerationReport> {
        validator::validate_selection(selection)?;
        let fs = self.filesystem.as_ref();
        let destination = selection.destination();

        if fs.exists(destination) {
            return Err(ApplicationError::ProjectExists {
                path: destination.to_path_buf(),
            }
            .into());
        }

        if !fs.is_dir(self.resolver.root()) {
            return Err(ApplicationError::TemplateRootMissing {
                path: self.resolver.root().to_path_buf(),
            }
            .into());
        }

        let base_dir = self.resolver.base_template_dir(selection.base_template());
        if !fs.is_dir(&base_dir) {
            return Err(ApplicationError::BaseTemplateNotFound {
                id: selection.base_template().to_string(),
                path: base_dir,
            }
            .into());
        }

        let staging = staging_dir(destination);
        info!(staging = %staging.display(), "Staging project");
        fs.create_dir_all(&staging)?;

        let mut report = GenerationReport::new(destination, selection.base_template());
        let result = self
            .build_staged(selection, &base_dir, &staging, &mut report)
            .and_then(|()| self.promote(&staging, destination));

        match result {
            Ok(()) => {
                self.observer.promoted(destination);
                info!(
                    addons = report.applied_addons().len(),
                    files = report.records().len(),
                    warnings = report.warnings().len(),
                    "Project generated"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "Generation failed, discarding staged project");
                self.rollback(&staging);
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn build_staged(
        &self,
        selection: &StackSelection,
        base_dir: &Path,
        staging: &Path,
        report: &mut GenerationReport,
    ) -> AnvilResult<()> {
        self.copy_tree(base_dir, staging)?;

        let fs = self.filesystem.as_ref();
        let dispatcher = FileMergeDispatcher::new(fs);
        let framework = selection.framework();
        // which addons touched each staged file, for placeholder parameters
        let mut writers: BTreeMap<RelativePath, Vec<&str>> = BTreeMap::new();

        for id in selection.addons() {
            let resolved = self
                .resolver
                .resolve(id, framework, fs)
                .map_err(|e| ApplicationError::addon_integration(id, e))?;

            let Some(addon) = resolved else {
                warn!(addon = %id, framework, "Addon not found, skipping");
                let warning = GenerationWarning::AddonNotFound {
                    addon: id.clone(),
                    framework: framework.to_string(),
                };
                self.observer.warning(&warning);
                report.warn(warning);
                continue;
            };

            info!(addon = %id, root = %addon.root().display(), "Applying addon");
            self.observer.addon_started(id, addon.root());

            let records = dispatcher
                .integrate(&addon, staging)
                .map_err(|e| ApplicationError::addon_integration(id, e))?;

            for record in records {
                if record.outcome != MergeOutcome::Skipped {
                    writers
                        .entry(record.path.clone())
                        .or_default()
                        .push(id.as_str());
                }
                if record.outcome.is_warning() {
                    let warning = GenerationWarning::UnsupportedFileType {
                        addon: id.clone(),
                        path: record.path.clone(),
                    };
                    self.observer.warning(&warning);
                    report.warn(warning);
                }
                self.observer.file_integrated(&record);
                report.record_file(record);
            }
            report.record_addon(id.clone());
        }

        self.substitute_placeholders(selection, staging, &writers)
    }

    /// Copy every file below `from` into `to`, keeping relative paths.
    fn copy_tree(&self, from: &Path, to: &Path) -> AnvilResult<()> {
        let fs = self.filesystem.as_ref();
        let files = fs.list_files(from)?;
        debug!(from = %from.display(), files = files.len(), "Copying tree");

        for file in &files {
            let dest = to.join(file);
            if let Some(parent) = dest.parent() {
                fs.create_dir_all(parent)?;
            }
            fs.copy_file(&from.join(file), &dest)?;
        }
        Ok(())
    }

    /// Replace `{{PLACEHOLDER}}` tokens in staged text files.
    ///
    /// Built-in project variables apply everywhere; addon parameters apply
    /// only to files that addon added, merged or replaced.
    fn substitute_placeholders(
        &self,
        selection: &StackSelection,
        staging: &Path,
        writers: &BTreeMap<RelativePath, Vec<&str>>,
    ) -> AnvilResult<()> {
        let fs = self.filesystem.as_ref();
        let builtins = RenderContext::new(selection.project_name());

        for file in fs.list_files(staging)? {
            let path = staging.join(&file);
            let bytes = fs.read_file(&path)?;
            let Ok(text) = std::str::from_utf8(&bytes) else {
                continue;
            };

            let mut ctx = builtins.clone();
            for addon in writers.get(&file).into_iter().flatten() {
                if let Some(params) = selection.params_for(addon) {
                    ctx = ctx.with_variables(params);
                }
            }

            if ctx.has_placeholders(text) {
                debug!(path = %file, "Substituting placeholders");
                fs.write_file(&path, ctx.render(text).as_bytes())?;
            }
        }
        Ok(())
    }

    /// Move the staged tree to `destination`.
    ///
    /// A same-filesystem rename is atomic. If it fails the tree is copied
    /// instead, and a partially copied destination is removed again.
    fn promote(&self, staging: &Path, destination: &Path) -> AnvilResult<()> {
        let fs = self.filesystem.as_ref();

        if fs.exists(destination) {
            return Err(ApplicationError::ProjectExists {
                path: destination.to_path_buf(),
            }
            .into());
        }

        match fs.rename(staging, destination) {
            Ok(()) => {
                info!(destination = %destination.display(), "Promoted staged project");
                return Ok(());
            }
            Err(e) => warn!(error = %e, "Rename failed, falling back to copy"),
        }

        let copied = fs
            .create_dir_all(destination)
            .and_then(|()| self.copy_tree(staging, destination));

        if let Err(e) = copied {
            self.rollback(destination);
            return Err(ApplicationError::PromotionFailed {
                path: destination.to_path_buf(),
                reason: e.to_string(),
            }
            .into());
        }

        self.rollback(staging);
        Ok(())
    }

    /// Best-effort removal of a directory this run created.
    fn rollback(&self, dir: &Path) {
        if !self.filesystem.exists(dir) {
            return;
        }
        if let Err(e) = self.filesystem.remove_dir_all(dir) {
            warn!(
                error = %e,
                path = %dir.display(),
                "Rollback failed"
            );
        } else {
            debug!(path = %dir.display(), "Rollback successful");
        }
    }
}

/// Hidden sibling of `destination`, unique per run.
fn staging_dir(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staged = format!(".{name}.anvil-{}", Uuid::new_v4().simple());
    match destination.parent() {
        Some(parent) => parent.join(staged),
        None => PathBuf::from(staged),
    }
}
