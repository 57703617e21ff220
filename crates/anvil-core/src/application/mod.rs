//! Application layer for Anvil.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, TemplateResolver)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer; merge rules and
//! search order live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    FileMergeDispatcher, GenerationPlan, ScaffoldService, TemplateResolver,
};

pub use ports::{Filesystem, GenerationObserver, NoopObserver, PackageInstaller};

pub use error::ApplicationError;
