//! Infrastructure adapters for Anvil.
//!
//! This crate implements the ports defined in `anvil-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod catalog;
pub mod filesystem;
pub mod installer;

// Re-export commonly used adapters
pub use catalog::{Catalog, CatalogEntry, DirectoryCatalog, ManifestError, TemplateManifest};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use installer::CommandInstaller;
