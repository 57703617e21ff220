//! Core domain layer for Anvil.
//!
//! Pure logic only: value objects, the selection aggregate, the addon
//! search table and the format mergers. All I/O goes through the ports
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: No filesystem, process or network calls
//! - **No logging**: Services log; the domain returns values and errors
//! - **Immutable entities**: Domain objects are `Clone + PartialEq`

pub mod catalog;
pub mod entities;
pub mod error;
pub mod merge;
pub mod value_objects;

mod validation;

pub use entities::{
    AddonTemplate, FileMergeRecord, GenerationReport, GenerationWarning, RenderContext,
    SelectionBuilder, StackSelection,
    common::RelativePath,
    selection::{AddonParams, HasBase, NoBase},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{AddonCategory, MergeOutcome, MergeStrategy, PackageManager};

pub use catalog::{SEARCH_ORDER, SearchStep};
pub use merge::OVERRIDE_MARKER;
pub use validation::DomainValidator;
