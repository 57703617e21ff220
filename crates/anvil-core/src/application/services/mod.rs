//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "resolve an addon" or "generate a project".

pub mod dispatcher;
pub mod scaffold_service;
pub mod template_resolver;

pub use dispatcher::FileMergeDispatcher;
pub use scaffold_service::{GenerationPlan, ScaffoldService};
pub use template_resolver::TemplateResolver;
