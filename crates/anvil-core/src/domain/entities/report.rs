//! Per-file outcomes and the summary returned by one generation run.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::common::RelativePath;
use crate::domain::value_objects::{MergeOutcome, MergeStrategy};

/// What the dispatcher did with one addon file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMergeRecord {
    pub addon: String,
    pub path: RelativePath,
    pub outcome: MergeOutcome,
    /// Merger that ran, or would have run, for this file name.
    pub strategy: Option<MergeStrategy>,
}

impl FileMergeRecord {
    pub fn new(
        addon: impl Into<String>,
        path: RelativePath,
        outcome: MergeOutcome,
        strategy: Option<MergeStrategy>,
    ) -> Self {
        Self {
            addon: addon.into(),
            path,
            outcome,
            strategy,
        }
    }
}

impl fmt::Display for FileMergeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<11} {} ({})", self.outcome, self.path, self.addon)?;
        if let (MergeOutcome::Merged, Some(strategy)) = (self.outcome, self.strategy) {
            write!(f, " via {strategy}")?;
        }
        Ok(())
    }
}

/// Non-fatal problems recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GenerationWarning {
    /// No template directory exists for the addon; it was skipped.
    AddonNotFound { addon: String, framework: String },
    /// No merger handles this file; the addon's copy replaced the existing one.
    UnsupportedFileType { addon: String, path: RelativePath },
}

impl fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddonNotFound { addon, framework } => {
                write!(f, "addon '{addon}' not found for framework '{framework}', skipped")
            }
            Self::UnsupportedFileType { addon, path } => {
                write!(f, "'{path}' from addon '{addon}' has no merger, overwritten")
            }
        }
    }
}

/// Summary of a successful generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    destination: PathBuf,
    base_template: String,
    applied_addons: Vec<String>,
    records: Vec<FileMergeRecord>,
    warnings: Vec<GenerationWarning>,
}

impl GenerationReport {
    pub fn new(destination: impl Into<PathBuf>, base_template: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            base_template: base_template.into(),
            applied_addons: Vec::new(),
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record_addon(&mut self, addon: impl Into<String>) {
        self.applied_addons.push(addon.into());
    }

    pub fn record_file(&mut self, record: FileMergeRecord) {
        self.records.push(record);
    }

    pub fn warn(&mut self, warning: GenerationWarning) {
        self.warnings.push(warning);
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn base_template(&self) -> &str {
        &self.base_template
    }

    /// Addons that were found and integrated, in application order.
    pub fn applied_addons(&self) -> &[String] {
        &self.applied_addons
    }

    pub fn records(&self) -> &[FileMergeRecord] {
        &self.records
    }

    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }

    pub fn count(&self, outcome: MergeOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Last record for `path`, which reflects its final state.
    pub fn last_record_for(&self, path: &str) -> Option<&FileMergeRecord> {
        self.records
            .iter()
            .rev()
            .find(|r| r.path.to_slash_string() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_lookup() {
        let mut report = GenerationReport::new("/tmp/app", "react-with-ts");
        report.record_addon("tailwind");
        report.record_file(FileMergeRecord::new(
            "tailwind",
            RelativePath::new("src/index.css"),
            MergeOutcome::Merged,
            Some(MergeStrategy::Stylesheet),
        ));
        report.record_file(FileMergeRecord::new(
            "shadcn",
            RelativePath::new("src/index.css"),
            MergeOutcome::Replaced,
            Some(MergeStrategy::Stylesheet),
        ));

        assert_eq!(report.count(MergeOutcome::Merged), 1);
        assert_eq!(report.count(MergeOutcome::Added), 0);
        assert_eq!(
            report.last_record_for("src/index.css").map(|r| r.outcome),
            Some(MergeOutcome::Replaced)
        );
    }

    #[test]
    fn warning_display() {
        let w = GenerationWarning::UnsupportedFileType {
            addon: "docker".into(),
            path: RelativePath::new("Dockerfile"),
        };
        assert_eq!(
            w.to_string(),
            "'Dockerfile' from addon 'docker' has no merger, overwritten"
        );
    }

    #[test]
    fn record_display_names_strategy_for_merges() {
        let record = FileMergeRecord::new(
            "prisma",
            RelativePath::new("package.json"),
            MergeOutcome::Merged,
            Some(MergeStrategy::StructuredData),
        );
        assert!(record.to_string().ends_with("via json"));
    }
}
