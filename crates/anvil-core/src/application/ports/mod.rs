//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `anvil-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations on the template root, staging area and destination
//!   - `GenerationObserver`: Live per-file progress
//!   - `PackageInstaller`: Dependency install in the generated project

pub mod output;

pub use output::{Filesystem, GenerationObserver, NoopObserver, PackageInstaller};
