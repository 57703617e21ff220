//! Addon search-order registry.
//!
//! The template root files addon directories under category groups, some of
//! them split per framework. An addon id is looked up against
//! [`SEARCH_ORDER`] and the first candidate directory that exists wins.
//!
//! # Adding a New Group
//!
//! 1. Add a variant to `AddonCategory` in `value_objects.rs`
//! 2. Add one [`SearchStep`] entry to [`SEARCH_ORDER`] at the right priority

use std::path::PathBuf;

use crate::domain::value_objects::AddonCategory;

/// Directory under the template root holding base templates.
pub const FRAMEWORKS_DIR: &str = "frameworks";

/// Directory under the template root holding addon groups.
pub const ADDONS_DIR: &str = "addons";

/// Framework whose addon variants are tried when the selected framework has
/// none of its own.
pub const DEFAULT_FALLBACK_FRAMEWORK: &str = "react";

/// One candidate location for an addon, relative to `addons/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// `<category>/<selected framework>/<id>`
    Scoped(AddonCategory),
    /// `<category>/<fallback framework>/<id>`
    Fallback(AddonCategory),
    /// `<category>/<id>`
    Unscoped(AddonCategory),
    /// `<id>`
    Direct,
}

/// Lookup priority. Framework-specific variants first, then the shared
/// backend group, then the generic framework's variants, then the unscoped
/// groups and finally the bare id.
pub static SEARCH_ORDER: &[SearchStep] = &[
    SearchStep::Scoped(AddonCategory::Styling),
    SearchStep::Scoped(AddonCategory::Orm),
    SearchStep::Scoped(AddonCategory::Auth),
    SearchStep::Unscoped(AddonCategory::Backend),
    SearchStep::Fallback(AddonCategory::Styling),
    SearchStep::Fallback(AddonCategory::Orm),
    SearchStep::Fallback(AddonCategory::Auth),
    SearchStep::Unscoped(AddonCategory::Extras),
    SearchStep::Unscoped(AddonCategory::PackageManager),
    SearchStep::Direct,
];

impl SearchStep {
    /// Candidate directory for `addon`, relative to `addons/`.
    pub fn relative_dir(self, addon: &str, framework: &str, fallback: &str) -> PathBuf {
        match self {
            Self::Scoped(category) => [category.as_str(), framework, addon].iter().collect(),
            Self::Fallback(category) => [category.as_str(), fallback, addon].iter().collect(),
            Self::Unscoped(category) => [category.as_str(), addon].iter().collect(),
            Self::Direct => PathBuf::from(addon),
        }
    }
}

/// Every candidate directory for `addon`, relative to `addons/`, in priority
/// order and without repeats.
///
/// When the selected framework is the fallback framework the two scoped
/// passes name the same directories; the second pass is dropped. An id that
/// names a group gets no bare candidate, so it never resolves to the group
/// directory itself.
pub fn candidate_dirs(addon: &str, framework: &str, fallback: &str) -> Vec<PathBuf> {
    let is_group = AddonCategory::ALL.iter().any(|c| c.as_str() == addon);
    let mut out: Vec<PathBuf> = Vec::with_capacity(SEARCH_ORDER.len());
    for step in SEARCH_ORDER {
        if is_group && *step == SearchStep::Direct {
            continue;
        }
        let dir = step.relative_dir(addon, framework, fallback);
        if !out.contains(&dir) {
            out.push(dir);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(addon: &str, framework: &str) -> Vec<String> {
        candidate_dirs(addon, framework, DEFAULT_FALLBACK_FRAMEWORK)
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn scoped_groups_come_first() {
        let dirs = rendered("clerk", "next");
        assert_eq!(
            dirs,
            [
                "styling/next/clerk",
                "orm/next/clerk",
                "auth/next/clerk",
                "backend/clerk",
                "styling/react/clerk",
                "orm/react/clerk",
                "auth/react/clerk",
                "extras/clerk",
                "package-manager/clerk",
                "clerk",
            ]
        );
    }

    #[test]
    fn fallback_pass_collapses_for_fallback_framework() {
        let dirs = rendered("tailwind", "react");
        assert_eq!(dirs.len(), SEARCH_ORDER.len() - 3);
        assert_eq!(dirs[0], "styling/react/tailwind");
        assert_eq!(dirs[3], "backend/tailwind");
        assert_eq!(dirs[4], "extras/tailwind");
    }

    #[test]
    fn group_names_have_no_bare_candidate() {
        for category in AddonCategory::ALL {
            let dirs = rendered(category.as_str(), "next");
            assert!(
                !dirs.iter().any(|d| d == category.as_str()),
                "{category} resolves to its own group directory"
            );
        }
        assert_eq!(
            rendered("extras", "next").last().map(String::as_str),
            Some("package-manager/extras")
        );
    }

    #[test]
    fn every_category_is_searched() {
        for category in AddonCategory::ALL {
            assert!(
                SEARCH_ORDER.iter().any(|step| matches!(
                    step,
                    SearchStep::Scoped(c) | SearchStep::Unscoped(c) if *c == category
                )),
                "{category} missing from search order"
            );
        }
    }
}
