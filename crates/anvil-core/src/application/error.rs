//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{AnvilError, ErrorCategory};

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Project already exists at target location.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// The base template directory is missing from the template root.
    #[error("Base template '{id}' not found at {path}")]
    BaseTemplateNotFound { id: String, path: PathBuf },

    /// The template root itself is missing or not a directory.
    #[error("Template root {path} does not exist")]
    TemplateRootMissing { path: PathBuf },

    /// A fatal error raised while one addon was being integrated.
    #[error("Failed to apply addon '{addon}': {source}")]
    AddonIntegration {
        addon: String,
        source: Box<AnvilError>,
    },

    /// The staged project could not be moved to its destination.
    #[error("Could not promote staged project to {path}: {reason}")]
    PromotionFailed { path: PathBuf, reason: String },

    /// The package manager install step failed.
    #[error("`{command}` failed: {reason}")]
    InstallFailed { command: String, reason: String },
}

impl ApplicationError {
    /// Wrap `source` with the addon it was raised for.
    pub fn addon_integration(addon: impl Into<String>, source: impl Into<AnvilError>) -> Self {
        Self::AddonIntegration {
            addon: addon.into(),
            source: Box::new(source.into()),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have read and write permissions".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Choose a different project name".into(),
                "Or remove the existing directory first".into(),
            ],
            Self::BaseTemplateNotFound { id, .. } => vec![
                format!("No base template named '{}'", id),
                "Try: anvil list to see available templates".into(),
                "Or point --templates at a different template root".into(),
            ],
            Self::TemplateRootMissing { path } => vec![
                format!("Expected a directory at {}", path.display()),
                "Set templates.root in the config file or pass --templates".into(),
            ],
            Self::AddonIntegration { addon, source } => {
                let mut out = vec![format!("The error was raised while applying '{}'", addon)];
                out.extend(source.suggestions());
                out
            }
            Self::PromotionFailed { .. } => vec![
                "The destination was created concurrently or the parent is not writable".into(),
                "No partial project was left behind".into(),
            ],
            Self::InstallFailed { command, .. } => vec![
                format!("The project was generated; run `{}` manually", command),
                "Check that the package manager is installed and on PATH".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. }
            | Self::PromotionFailed { .. }
            | Self::InstallFailed { .. } => ErrorCategory::Internal,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::BaseTemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::TemplateRootMissing { .. } => ErrorCategory::Configuration,
            Self::AddonIntegration { source, .. } => source.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, MergeStrategy};

    #[test]
    fn addon_integration_keeps_source_category() {
        let err = ApplicationError::addon_integration(
            "prisma",
            DomainError::merge_failed("package.json", MergeStrategy::StructuredData, "eof"),
        );
        assert_eq!(err.category(), ErrorCategory::Merge);
        assert!(err.to_string().contains("prisma"));
        assert!(err.to_string().contains("package.json"));
        assert!(err.suggestions()[0].contains("prisma"));
    }

    #[test]
    fn missing_base_is_not_found() {
        let err = ApplicationError::BaseTemplateNotFound {
            id: "vue".into(),
            path: "/t/frameworks/vue".into(),
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }
}
