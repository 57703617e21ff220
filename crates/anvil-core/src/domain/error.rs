// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::value_objects::MergeStrategy;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports and observers keep copies)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid stack selection: {0}")]
    InvalidSelection(String),

    #[error("Invalid template identifier '{id}': {reason}")]
    InvalidTemplateId { id: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Path escapes its root: {path}")]
    PathEscapesRoot { path: String },

    #[error("Unknown addon category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown package manager '{0}'")]
    UnknownPackageManager(String),

    // ========================================================================
    // Merge Errors
    // ========================================================================
    /// A format merger could not make sense of one of its inputs.
    #[error("Cannot {strategy} merge '{path}': {reason}")]
    MergeFailed {
        path: String,
        strategy: MergeStrategy,
        reason: String,
    },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Build a [`DomainError::MergeFailed`] for `path`.
    pub fn merge_failed(
        path: impl Into<String>,
        strategy: MergeStrategy,
        reason: impl Into<String>,
    ) -> Self {
        Self::MergeFailed {
            path: path.into(),
            strategy,
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSelection(msg) => vec![
                "Check the base template and addon identifiers".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidTemplateId { id, .. } => vec![
                format!("'{}' is not a usable template identifier", id),
                "Identifiers are single directory names such as 'tailwind' or 'react-with-ts'"
                    .into(),
            ],
            Self::MergeFailed { path, strategy, .. } => vec![
                format!("The {} merger rejected '{}'", strategy, path),
                "Fix the syntax in the base template or the addon file".into(),
                "Or start the addon file with /*override*/ to replace it wholesale".into(),
            ],
            Self::UnknownPackageManager(_) => {
                vec!["Supported package managers: npm, pnpm, yarn, bun".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSelection(_)
            | Self::InvalidTemplateId { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::PathEscapesRoot { .. }
            | Self::UnknownCategory(_)
            | Self::UnknownPackageManager(_)
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::MergeFailed { .. } => ErrorCategory::Merge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Merge,
}
