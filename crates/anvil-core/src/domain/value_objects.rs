//! Domain value objects: AddonCategory, MergeStrategy, MergeOutcome,
//! PackageManager.
//!
//! # Design
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! The search order over categories lives in `catalog.rs`; the merge
//! algorithms live in `merge/`. This file only defines the types, their
//! string representations, and their `FromStr` parsers.

use crate::domain::entities::common::RelativePath;
use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── AddonCategory ─────────────────────────────────────────────────────────────

/// The group an addon template is filed under in the template root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddonCategory {
    Styling,
    Orm,
    Auth,
    Backend,
    Extras,
    PackageManager,
}

impl AddonCategory {
    pub const ALL: [Self; 6] = [
        Self::Styling,
        Self::Orm,
        Self::Auth,
        Self::Backend,
        Self::Extras,
        Self::PackageManager,
    ];

    /// Directory name of this group under `addons/`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Styling => "styling",
            Self::Orm => "orm",
            Self::Auth => "auth",
            Self::Backend => "backend",
            Self::Extras => "extras",
            Self::PackageManager => "package-manager",
        }
    }

    /// Whether addons in this group have per-framework variants.
    pub const fn is_framework_scoped(self) -> bool {
        matches!(self, Self::Styling | Self::Orm | Self::Auth)
    }
}

impl fmt::Display for AddonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddonCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "styling" | "style" => Ok(Self::Styling),
            "orm" | "database" | "db" => Ok(Self::Orm),
            "auth" => Ok(Self::Auth),
            "backend" => Ok(Self::Backend),
            "extras" | "extra" => Ok(Self::Extras),
            "package-manager" | "package_manager" => Ok(Self::PackageManager),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

// ── MergeStrategy ─────────────────────────────────────────────────────────────

/// Which format merger reconciles a file collision.
///
/// Variants are declared in selection priority order: a file name can match
/// several patterns (`vite.config.ts` is also a `.ts` source file) and the
/// first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    BuildConfig,
    Stylesheet,
    SourceText,
    StructuredData,
    EnvFile,
}

const BUILD_CONFIG_NAMES: &[&str] = &[
    "vite.config.ts",
    "vite.config.js",
    "vite.config.mts",
    "vite.config.mjs",
];

const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

impl MergeStrategy {
    pub const PRIORITY: [Self; 5] = [
        Self::BuildConfig,
        Self::Stylesheet,
        Self::SourceText,
        Self::StructuredData,
        Self::EnvFile,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BuildConfig => "build-config",
            Self::Stylesheet => "stylesheet",
            Self::SourceText => "source",
            Self::StructuredData => "json",
            Self::EnvFile => "env",
        }
    }

    /// Select the merger for a file, or `None` when no merger applies.
    pub fn for_path(path: &RelativePath) -> Option<Self> {
        let name = path.file_name()?;
        Self::PRIORITY.into_iter().find(|s| s.matches(name))
    }

    /// Whether this strategy claims a file with the given name.
    pub fn matches(self, file_name: &str) -> bool {
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext);
        match self {
            Self::BuildConfig => BUILD_CONFIG_NAMES.contains(&file_name),
            Self::Stylesheet => extension == Some("css"),
            Self::SourceText => extension.is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext)),
            Self::StructuredData => extension == Some("json"),
            Self::EnvFile => {
                file_name == ".env"
                    || file_name.ends_with(".env")
                    || file_name.starts_with(".env.")
            }
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MergeOutcome ──────────────────────────────────────────────────────────────

/// What happened to one addon file during integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeOutcome {
    /// Destination did not exist; the file was copied.
    Added,
    /// A format merger combined both sides.
    Merged,
    /// The addon file carried the override marker and replaced the destination.
    Replaced,
    /// Both sides were byte-identical; nothing was written.
    Skipped,
    /// No merger applies; the destination was overwritten (lossy).
    OverwrittenWarning,
}

impl MergeOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Merged => "merged",
            Self::Replaced => "replaced",
            Self::Skipped => "skipped",
            Self::OverwrittenWarning => "overwritten",
        }
    }

    pub const fn is_warning(self) -> bool {
        matches!(self, Self::OverwrittenWarning)
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PackageManager ────────────────────────────────────────────────────────────

/// Package manager used for the post-generation install step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pnpm => "pnpm",
            Self::Yarn => "yarn",
            Self::Bun => "bun",
        }
    }

    /// Program name to spawn.
    pub const fn program(&self) -> &'static str {
        self.as_str()
    }

    /// Arguments for a plain dependency install.
    pub const fn install_args(&self) -> &'static [&'static str] {
        &["install"]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "pnpm" => Ok(Self::Pnpm),
            "yarn" => Ok(Self::Yarn),
            "bun" => Ok(Self::Bun),
            other => Err(DomainError::UnknownPackageManager(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(path: &str) -> Option<MergeStrategy> {
        MergeStrategy::for_path(&RelativePath::new(path))
    }

    #[test]
    fn build_config_wins_over_source_extension() {
        assert_eq!(strategy("vite.config.ts"), Some(MergeStrategy::BuildConfig));
        assert_eq!(strategy("vite.config.js"), Some(MergeStrategy::BuildConfig));
        assert_eq!(strategy("src/vite.ts"), Some(MergeStrategy::SourceText));
    }

    #[test]
    fn extensions_select_mergers() {
        assert_eq!(strategy("src/index.css"), Some(MergeStrategy::Stylesheet));
        assert_eq!(strategy("src/App.tsx"), Some(MergeStrategy::SourceText));
        assert_eq!(strategy("lib/db.mjs"), Some(MergeStrategy::SourceText));
        assert_eq!(strategy("package.json"), Some(MergeStrategy::StructuredData));
        assert_eq!(strategy("tsconfig.app.json"), Some(MergeStrategy::StructuredData));
    }

    #[test]
    fn env_file_patterns() {
        assert_eq!(strategy(".env"), Some(MergeStrategy::EnvFile));
        assert_eq!(strategy(".env.example"), Some(MergeStrategy::EnvFile));
        assert_eq!(strategy(".env.local"), Some(MergeStrategy::EnvFile));
        assert_eq!(strategy("docker/app.env"), Some(MergeStrategy::EnvFile));
    }

    #[test]
    fn unknown_extensions_have_no_merger() {
        assert_eq!(strategy("README.md"), None);
        assert_eq!(strategy("Dockerfile"), None);
        assert_eq!(strategy("prisma/schema.prisma"), None);
    }

    #[test]
    fn category_parses_aliases() {
        assert_eq!("database".parse::<AddonCategory>().unwrap(), AddonCategory::Orm);
        assert_eq!(
            "package_manager".parse::<AddonCategory>().unwrap(),
            AddonCategory::PackageManager
        );
        assert!("widgets".parse::<AddonCategory>().is_err());
    }

    #[test]
    fn scoped_categories() {
        assert!(AddonCategory::Styling.is_framework_scoped());
        assert!(AddonCategory::Auth.is_framework_scoped());
        assert!(!AddonCategory::Backend.is_framework_scoped());
        assert!(!AddonCategory::Extras.is_framework_scoped());
    }

    #[test]
    fn package_manager_round_trips_names() {
        for pm in [
            PackageManager::Npm,
            PackageManager::Pnpm,
            PackageManager::Yarn,
            PackageManager::Bun,
        ] {
            assert_eq!(pm.as_str().parse::<PackageManager>().unwrap(), pm);
        }
        assert!("cargo".parse::<PackageManager>().is_err());
    }

    #[test]
    fn only_overwrite_is_a_warning() {
        assert!(MergeOutcome::OverwrittenWarning.is_warning());
        assert!(!MergeOutcome::Merged.is_warning());
        assert!(!MergeOutcome::Skipped.is_warning());
    }
}
