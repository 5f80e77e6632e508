//! The workspace facade: open a project by name, then ask for its
//! compilation or its declarations.

mod config;
mod facade;

pub use config::WorkspaceConfig;
pub use facade::{ProjectHandle, Workspace};
