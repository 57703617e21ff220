//! Format mergers.
//!
//! Each merger is a pure function `(existing, incoming) -> merged` for one
//! file format. None of them is a full parser: they reconcile the parts of a
//! file that addons commonly extend (imports, plugin lists, config keys) and
//! concatenate the rest. The dispatcher picks the merger from the file name
//! via [`MergeStrategy::for_path`].

pub mod build_config;
pub mod css;
pub mod env;
pub mod json;
pub mod source;

use crate::domain::error::DomainError;
use crate::domain::value_objects::MergeStrategy;

/// Directive that makes an addon file replace its destination wholesale.
pub const OVERRIDE_MARKER: &str = "/*override*/";

/// If `text` starts (after leading whitespace) with [`OVERRIDE_MARKER`],
/// return the content after the marker and any whitespace that follows it.
pub fn strip_override(text: &str) -> Option<&str> {
    text.trim_start()
        .strip_prefix(OVERRIDE_MARKER)
        .map(str::trim_start)
}

/// Run the merger for `strategy`.
///
/// `file_name` is the destination's final path component; the structured
/// data merger uses it to enable its tsconfig handling. `path` is only used
/// in error messages.
pub fn merge(
    strategy: MergeStrategy,
    path: &str,
    existing: &str,
    incoming: &str,
) -> Result<String, DomainError> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match strategy {
        MergeStrategy::BuildConfig => Ok(build_config::merge(existing, incoming)),
        MergeStrategy::Stylesheet => Ok(css::merge(existing, incoming)),
        MergeStrategy::SourceText => Ok(source::merge(existing, incoming)),
        MergeStrategy::StructuredData => json::merge(file_name, existing, incoming)
            .map_err(|reason| DomainError::merge_failed(path, strategy, reason)),
        MergeStrategy::EnvFile => Ok(env::merge(existing, incoming)),
    }
}
