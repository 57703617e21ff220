//! Crate-level error type.
//!
//! Every fallible public operation returns [`AnvilResult`]. Layer errors
//! convert into [`AnvilError`] with `?`.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{self, DomainError};

#[derive(Debug, Error, Clone)]
pub enum AnvilError {
    /// Invalid selection, bad template id, or a merger rejecting its input.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Orchestration failures: missing templates, I/O, promotion.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Malformed catalog metadata or other setup problems.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl AnvilError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Fix the file named above and run the command again".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Anvil".into()],
        }
    }

    /// Coarse classification; callers map it to exit codes and styling.
    /// Addon wrappers report the category of the error they carry.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                domain::ErrorCategory::Validation => ErrorCategory::Validation,
                domain::ErrorCategory::Merge => ErrorCategory::Merge,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Innermost error, looking through addon wrappers.
    pub fn root_cause(&self) -> &AnvilError {
        match self {
            Self::Application(ApplicationError::AddonIntegration { source, .. }) => {
                source.root_cause()
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Merge,
    Configuration,
    Internal,
}

pub type AnvilResult<T> = Result<T, AnvilError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MergeStrategy;
    use std::path::PathBuf;

    #[test]
    fn root_cause_unwraps_addon_wrappers() {
        let inner = DomainError::merge_failed("a.json", MergeStrategy::StructuredData, "bad");
        let err: AnvilError = ApplicationError::addon_integration(
            "outer",
            ApplicationError::addon_integration("inner", inner.clone()),
        )
        .into();

        assert!(matches!(err.root_cause(), AnvilError::Domain(e) if *e == inner));
        assert_eq!(err.category(), ErrorCategory::Merge);
    }

    #[test]
    fn missing_base_is_not_found() {
        let err: AnvilError = ApplicationError::BaseTemplateNotFound {
            id: "svelte".into(),
            path: PathBuf::from("/t/frameworks/svelte"),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.root_cause().to_string().contains("svelte"));
    }
}
