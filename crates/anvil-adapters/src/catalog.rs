//! Template catalog: discovers base templates and addons under a template root.
//!
//! Directory layout is the source of truth for what exists. An optional
//! `catalog.toml` at the root adds display names, descriptions and the
//! framework type of each base template:
//!
//! ```toml
//! [[frameworks]]
//! id = "react-with-ts"
//! name = "React with TypeScript"
//! type = "react"
//!
//! [[addons]]
//! id = "tailwind"
//! name = "Tailwind CSS"
//! category = "styling"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anvil_core::{
    application::ports::Filesystem,
    domain::{
        AddonCategory,
        catalog::{ADDONS_DIR, FRAMEWORKS_DIR},
    },
    error::{AnvilError, AnvilResult},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// File name of the optional catalog manifest at the template root.
pub const MANIFEST_FILE: &str = "catalog.toml";

/// Errors reading `catalog.toml`.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{path} is not valid UTF-8")]
    Encoding { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl From<ManifestError> for AnvilError {
    fn from(e: ManifestError) -> Self {
        AnvilError::Configuration {
            message: e.to_string(),
        }
    }
}

/// Contents of `catalog.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateManifest {
    pub frameworks: Vec<FrameworkMeta>,
    pub addons: Vec<AddonMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrameworkMeta {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Framework context used for addon lookup, e.g. `next`.
    #[serde(rename = "type")]
    pub framework_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddonMeta {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<AddonCategory>,
}

impl TemplateManifest {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ManifestError> {
        toml::from_str(text).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One base template found under `frameworks/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// For base templates: the framework type. For addons: the frameworks
    /// with a dedicated variant.
    pub frameworks: Vec<String>,
    pub category: Option<AddonCategory>,
    pub path: PathBuf,
}

/// Everything available under one template root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub bases: Vec<CatalogEntry>,
    pub addons: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn base(&self, id: &str) -> Option<&CatalogEntry> {
        self.bases.iter().find(|b| b.id == id)
    }

    pub fn addon(&self, id: &str) -> Option<&CatalogEntry> {
        self.addons.iter().find(|a| a.id == id)
    }

    /// Framework type declared for a base template, if any.
    pub fn framework_of(&self, base: &str) -> Option<&str> {
        self.base(base)?.frameworks.first().map(String::as_str)
    }
}

/// Scans a template root through the [`Filesystem`] port.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read `catalog.toml`, or an empty manifest when there is none.
    pub fn manifest(&self, fs: &dyn Filesystem) -> AnvilResult<TemplateManifest> {
        let path = self.root.join(MANIFEST_FILE);
        if !fs.exists(&path) {
            return Ok(TemplateManifest::default());
        }
        let bytes = fs.read_file(&path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| ManifestError::Encoding { path: path.clone() })?;
        Ok(TemplateManifest::parse(&text, &path)?)
    }

    /// Discover every base template and addon.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub fn load(&self, fs: &dyn Filesystem) -> AnvilResult<Catalog> {
        let manifest = self.manifest(fs)?;
        let catalog = Catalog {
            bases: self.scan_bases(fs, &manifest)?,
            addons: self.scan_addons(fs, &manifest)?,
        };
        debug!(
            bases = catalog.bases.len(),
            addons = catalog.addons.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    fn scan_bases(
        &self,
        fs: &dyn Filesystem,
        manifest: &TemplateManifest,
    ) -> AnvilResult<Vec<CatalogEntry>> {
        let dir = self.root.join(FRAMEWORKS_DIR);
        if !fs.is_dir(&dir) {
            return Ok(Vec::new());
        }

        Ok(fs
            .list_dirs(&dir)?
            .into_iter()
            .map(|id| {
                let meta = manifest.frameworks.iter().find(|f| f.id == id);
                CatalogEntry {
                    name: meta.and_then(|m| m.name.clone()).unwrap_or_else(|| id.clone()),
                    description: meta.and_then(|m| m.description.clone()),
                    frameworks: meta
                        .and_then(|m| m.framework_type.clone())
                        .into_iter()
                        .collect(),
                    category: None,
                    path: dir.join(&id),
                    id,
                }
            })
            .collect())
    }

    fn scan_addons(
        &self,
        fs: &dyn Filesystem,
        manifest: &TemplateManifest,
    ) -> AnvilResult<Vec<CatalogEntry>> {
        let dir = self.root.join(ADDONS_DIR);
        if !fs.is_dir(&dir) {
            return Ok(Vec::new());
        }

        // id -> (category, frameworks, first path seen)
        let mut found: BTreeMap<String, (Option<AddonCategory>, Vec<String>, PathBuf)> =
            BTreeMap::new();
        let mut record = |id: String, category, framework: Option<String>, path: PathBuf| {
            let entry = found
                .entry(id)
                .or_insert_with(|| (category, Vec::new(), path));
            if entry.0.is_none() {
                entry.0 = category;
            }
            if let Some(fw) = framework.filter(|fw| !entry.1.contains(fw)) {
                entry.1.push(fw);
            }
        };

        for group in fs.list_dirs(&dir)? {
            let group_dir = dir.join(&group);
            match group.parse::<AddonCategory>() {
                Ok(category) if category.is_framework_scoped() => {
                    for framework in fs.list_dirs(&group_dir)? {
                        let fw_dir = group_dir.join(&framework);
                        for id in fs.list_dirs(&fw_dir)? {
                            let path = fw_dir.join(&id);
                            record(id, Some(category), Some(framework.clone()), path);
                        }
                    }
                }
                Ok(category) if category.as_str() == group => {
                    for id in fs.list_dirs(&group_dir)? {
                        let path = group_dir.join(&id);
                        record(id, Some(category), None, path);
                    }
                }
                // bare addon directory directly under addons/
                _ => record(group, None, None, group_dir),
            }
        }

        Ok(found
            .into_iter()
            .map(|(id, (category, frameworks, path))| {
                let meta = manifest.addons.iter().find(|a| a.id == id);
                CatalogEntry {
                    name: meta.and_then(|m| m.name.clone()).unwrap_or_else(|| id.clone()),
                    description: meta.and_then(|m| m.description.clone()),
                    category: category.or_else(|| meta.and_then(|m| m.category)),
                    frameworks,
                    path,
                    id,
                }
            })
            .collect())
    }
}
