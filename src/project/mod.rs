//! Project management: solution descriptors, the project graph, and loading
//! documents from disk.

mod descriptor;
mod graph;
mod loader;

pub use descriptor::{ProjectDescriptor, SolutionDescriptor};
pub use graph::{ProjectGraph, ProjectSet};
pub(crate) use graph::project_key;
pub use loader::{SolutionLoader, discover_project};
