//! Anvil Core - template composition and merge engine.
//!
//! This crate provides the domain and application layers for the Anvil
//! project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            anvil-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  ScaffoldService → TemplateResolver     │
//! │                  → FileMergeDispatcher  │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ Filesystem, GenerationObserver,         │
//! │ PackageInstaller                        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     anvil-adapters (Infrastructure)     │
//! │ LocalFilesystem, MemoryFilesystem, ...  │
//! └─────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ StackSelection, format mergers,         │
//! │ addon search order                      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use anvil_core::prelude::*;
//!
//! let selection = StackSelection::builder()
//!     .base("react-with-ts")
//!     .addons(["tailwind", "shadcn"])
//!     .destination("/home/me/projects/shop")
//!     .build()?;
//!
//! let service = ScaffoldService::new("/opt/anvil/templates", Box::new(filesystem));
//! let report = service.generate(&selection)?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, GenerationPlan, ScaffoldService, TemplateResolver,
        ports::{Filesystem, GenerationObserver, PackageInstaller},
    };
    pub use crate::domain::{
        AddonCategory, AddonTemplate, FileMergeRecord, GenerationReport, GenerationWarning,
        MergeOutcome, MergeStrategy, PackageManager, RelativePath, RenderContext,
        StackSelection,
    };
    pub use crate::error::{AnvilError, AnvilResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
