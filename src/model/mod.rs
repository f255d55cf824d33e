pub mod phase;
pub mod project;
pub mod timeline;
pub mod validate;

pub use phase::{Baseline, DependencyKind, DependencyRef, Phase};
pub use project::Project;
pub use timeline::{UnknownViewMode, ViewMode};
