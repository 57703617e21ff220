//! The `StackSelection` aggregate and its typestate builder.
//!
//! A `StackSelection` is the fully-resolved input to one generation run:
//! which base template to copy, which addons to layer on top (in order), and
//! where the finished project goes. Compatibility between addons is the
//! caller's business; this type only guarantees that the identifiers are
//! usable as directory names and that the destination is absolute.
//!
//! # Typestate builder
//!
//! The builder uses two phantom marker types (`NoBase` / `HasBase`) to
//! enforce at *compile time* that a base template is chosen before anything
//! else. Runtime validation (`validate`) still runs at `build()`.
//!
//! # Domain purity
//!
//! This module must not import `tracing`.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// Placeholder values for one addon, keyed by placeholder name.
pub type AddonParams = BTreeMap<String, String>;

// ── Aggregate root ────────────────────────────────────────────────────────────

/// Immutable description of one generation run.
///
/// Addon order is significant and duplicates are kept: applying an addon
/// twice is the caller's choice, and the merge engine honours it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSelection {
    base_template: String,
    addons: Vec<String>,
    destination: PathBuf,
    framework: Option<String>,
    project_name: String,
    addon_params: BTreeMap<String, AddonParams>,
}

impl StackSelection {
    /// Start building a new `StackSelection`.
    pub fn builder() -> SelectionBuilder<NoBase> {
        SelectionBuilder::new()
    }

    pub fn base_template(&self) -> &str {
        &self.base_template
    }

    pub fn addons(&self) -> &[String] {
        &self.addons
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Framework context used to find framework-specific addon variants.
    ///
    /// Falls back to the base template's leading segment, so
    /// `react-with-ts` resolves addons as `react`.
    pub fn framework(&self) -> &str {
        self.framework.as_deref().unwrap_or_else(|| {
            self.base_template
                .split('-')
                .next()
                .unwrap_or(&self.base_template)
        })
    }

    /// Placeholder values supplied for `addon`, if any.
    pub fn params_for(&self, addon: &str) -> Option<&AddonParams> {
        self.addon_params.get(addon).filter(|p| !p.is_empty())
    }

    pub fn addon_params(&self) -> &BTreeMap<String, AddonParams> {
        &self.addon_params
    }

    /// Validate internal consistency.
    ///
    /// Called automatically by the builder.
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_template_id(&self.base_template)?;
        for addon in &self.addons {
            validate_template_id(addon)?;
        }
        if let Some(fw) = &self.framework {
            validate_template_id(fw)?;
        }

        if !self.destination.is_absolute() {
            return Err(DomainError::InvalidSelection(format!(
                "destination must be an absolute path, got '{}'",
                self.destination.display()
            )));
        }
        if self.destination.file_name().is_none() {
            return Err(DomainError::InvalidSelection(format!(
                "destination '{}' has no final directory name",
                self.destination.display()
            )));
        }

        for addon in self.addon_params.keys() {
            if !self.addons.contains(addon) {
                return Err(DomainError::InvalidSelection(format!(
                    "parameters given for addon '{addon}' which is not selected"
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Display for StackSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_template)?;
        for addon in &self.addons {
            write!(f, " + {addon}")?;
        }
        Ok(())
    }
}

/// Template identifiers become directory names under the template root.
fn validate_template_id(id: &str) -> Result<(), DomainError> {
    let reason = if id.trim().is_empty() {
        Some("identifier is empty")
    } else if id.contains(['/', '\\']) {
        Some("identifier must not contain path separators")
    } else if id == "." || id == ".." {
        Some("identifier must not be a relative directory reference")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidTemplateId {
            id: id.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

// ── Typestate markers ─────────────────────────────────────────────────────────

/// Marker: base template has not yet been set.
pub struct NoBase;
/// Marker: base template has been set; other fields may now be configured.
pub struct HasBase;

// ── Builder ───────────────────────────────────────────────────────────────────

/// Typestate builder for [`StackSelection`].
pub struct SelectionBuilder<B> {
    base_template: Option<String>,
    addons: Vec<String>,
    destination: Option<PathBuf>,
    framework: Option<String>,
    project_name: Option<String>,
    addon_params: BTreeMap<String, AddonParams>,
    _marker: PhantomData<B>,
}

impl SelectionBuilder<NoBase> {
    pub fn new() -> Self {
        Self {
            base_template: None,
            addons: Vec::new(),
            destination: None,
            framework: None,
            project_name: None,
            addon_params: BTreeMap::new(),
            _marker: PhantomData,
        }
    }

    /// Set the base template. This transitions the builder to `HasBase`.
    pub fn base(self, base_template: impl Into<String>) -> SelectionBuilder<HasBase> {
        SelectionBuilder {
            base_template: Some(base_template.into()),
            addons: self.addons,
            destination: self.destination,
            framework: self.framework,
            project_name: self.project_name,
            addon_params: self.addon_params,
            _marker: PhantomData,
        }
    }
}

impl Default for SelectionBuilder<NoBase> {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionBuilder<HasBase> {
    /// Append one addon to the ordered list.
    pub fn addon(mut self, id: impl Into<String>) -> Self {
        self.addons.push(id.into());
        self
    }

    /// Append several addons, keeping their order.
    pub fn addons<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addons.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = Some(path.into());
        self
    }

    /// Override the framework context derived from the base template.
    pub fn framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    /// Name used for the built-in `PROJECT_NAME*` placeholders.
    ///
    /// Defaults to the destination's final directory name.
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    /// Supply a placeholder value consumed by one addon's files.
    pub fn addon_param(
        mut self,
        addon: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.addon_params
            .entry(addon.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Build and validate the `StackSelection`.
    pub fn build(self) -> Result<StackSelection, DomainError> {
        let base_template = self
            .base_template
            .ok_or(DomainError::MissingRequiredField {
                field: "base_template",
            })?;
        let destination = self
            .destination
            .ok_or(DomainError::MissingRequiredField {
                field: "destination",
            })?;

        let project_name = self.project_name.unwrap_or_else(|| {
            destination
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        let selection = StackSelection {
            base_template,
            addons: self.addons,
            destination,
            framework: self.framework,
            project_name,
            addon_params: self.addon_params,
        };

        selection.validate()?;
        Ok(selection)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
