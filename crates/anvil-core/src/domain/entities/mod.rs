pub mod addon;
pub mod common;
pub mod render;
pub mod report;
pub mod selection;

pub use crate::domain::DomainError;
pub use addon::AddonTemplate;
pub use render::RenderContext;
pub use report::{FileMergeRecord, GenerationReport, GenerationWarning};
pub use selection::{SelectionBuilder, StackSelection};
