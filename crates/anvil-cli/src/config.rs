//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `ANVIL_` prefix, `__` between sections
//!    (`ANVIL_TEMPLATES__ROOT`, `ANVIL_INSTALL__ENABLED`)
//! 3. Config file (`--config`, or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use anvil_core::domain::{PackageManager, catalog::DEFAULT_FALLBACK_FRAMEWORK};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where templates live and how addons are looked up.
    pub templates: TemplateConfig,
    /// Post-generation dependency install.
    pub install: InstallConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    pub fallback_framework: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            root: None,
            fallback_framework: DEFAULT_FALLBACK_FRAMEWORK.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    pub package_manager: PackageManager,
    pub enabled: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            package_manager: PackageManager::default(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from defaults, the config file and `ANVIL_*`
    /// environment variables.
    ///
    /// A file passed with `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let env = Environment::with_prefix("ANVIL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        Self::load_from(config_file, env)
    }

    fn load_from(config_file: Option<&PathBuf>, env: Environment) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };

        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.anvil.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "anvil", "anvil")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".anvil.toml"))
    }

    /// Template root to use: the flag if given, else `templates.root`, else
    /// `templates/` under the platform data dir.
    pub fn template_root(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.templates.root.clone())
            .unwrap_or_else(|| {
                directories::ProjectDirs::from("dev", "anvil", "anvil")
                    .map(|d| d.data_dir().join("templates"))
                    .unwrap_or_else(|| PathBuf::from("templates"))
            })
    }

    /// Every key understood by [`Self::get`], in display order.
    pub const KEYS: [&'static str; 5] = [
        "templates.root",
        "templates.fallback_framework",
        "install.package_manager",
        "install.enabled",
        "output.no_color",
    ];

    /// Value of a dotted key, as shown by `anvil config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "templates.root" => self
                .templates
                .root
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "templates.fallback_framework" => self.templates.fallback_framework.clone(),
            "install.package_manager" => self.install.package_manager.to_string(),
            "install.enabled" => self.install.enabled.to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            _ => return None,
        };
        Some(value)
    }
}
