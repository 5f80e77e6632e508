//! Error types for workspace, graph and compilation operations.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::toolchain::{Diagnostic, render_diagnostics};

/// Every failure the crate reports.
///
/// Structural errors (`ProjectNotFound`, `DuplicateProject`,
/// `DanglingReference`, `CyclicReference`) are raised while resolving the
/// project graph, before any toolchain work starts.
#[derive(Debug, Clone, Error)]
pub enum WorkspaceError {
    #[error("Cannot find project {name}")]
    ProjectNotFound { name: String },

    #[error("Duplicate project {name} (project names are case-insensitive)")]
    DuplicateProject { name: String },

    #[error("Project {project} references unknown project {reference}")]
    DanglingReference { project: String, reference: String },

    #[error("Cyclic project reference: {}", .cycle.join(" -> "))]
    CyclicReference { cycle: Vec<String> },

    #[error("Document not found: {}", .path.display())]
    DocumentNotFound { path: PathBuf },

    #[error("Compilation of {project} failed:\n{}", render_diagnostics(.diagnostics))]
    Compilation {
        project: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("Failed to load workspace:\n{}", render_diagnostics(.diagnostics))]
    WorkspaceLoad { diagnostics: Vec<Diagnostic> },

    #[error("Build of {project} timed out after {timeout:?}")]
    BuildTimeout { project: String, timeout: Duration },
}

impl WorkspaceError {
    pub fn project_not_found(name: impl Into<String>) -> Self {
        Self::ProjectNotFound { name: name.into() }
    }

    pub fn document_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DocumentNotFound { path: path.into() }
    }

    /// Diagnostics carried by `Compilation` and `WorkspaceLoad`; empty otherwise.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Compilation { diagnostics, .. } | Self::WorkspaceLoad { diagnostics } => {
                diagnostics
            }
            _ => &[],
        }
    }

    /// True for errors caused by the shape of the project graph.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound { .. }
                | Self::DuplicateProject { .. }
                | Self::DanglingReference { .. }
                | Self::CyclicReference { .. }
        )
    }
}

pub type Result<T, E = WorkspaceError> = std::result::Result<T, E>;
