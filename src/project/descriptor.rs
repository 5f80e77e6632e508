//! Solution descriptors — the input the workspace is opened from.
//!
//! A descriptor is what a build-system collaborator hands over after reading
//! its own project files: project names, their document paths and their
//! references. Nothing here is validated; [`ProjectSet`](super::ProjectSet)
//! does that when the graph is built.

use std::path::PathBuf;

#[cfg(feature = "manifest")]
use serde::{Deserialize, Serialize};

/// One project as described by the build system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
pub struct ProjectDescriptor {
    pub name: String,
    /// Document paths in compilation order.
    #[cfg_attr(feature = "manifest", serde(default))]
    pub documents: Vec<PathBuf>,
    /// Names of referenced projects.
    #[cfg_attr(feature = "manifest", serde(default))]
    pub references: Vec<String>,
}

impl ProjectDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.documents.push(path.into());
        self
    }

    pub fn with_documents<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.documents.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_reference(mut self, project: impl Into<String>) -> Self {
        self.references.push(project.into());
        self
    }
}

/// A solution: where it came from and the projects it lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "manifest", derive(Serialize, Deserialize))]
pub struct SolutionDescriptor {
    /// Path of the solution file, if it came from disk. Informational only.
    #[cfg_attr(feature = "manifest", serde(default))]
    pub path: Option<PathBuf>,
    pub projects: Vec<ProjectDescriptor>,
}

impl SolutionDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            projects: Vec::new(),
        }
    }

    pub fn with_project(mut self, project: ProjectDescriptor) -> Self {
        self.projects.push(project);
        self
    }

    /// Human-readable name for logs: the solution path, or `<memory>`.
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string())
    }
}

#[cfg(feature = "manifest")]
mod manifest {
    use std::path::Path;

    use super::SolutionDescriptor;
    use crate::error::{Result, WorkspaceError};
    use crate::toolchain::Diagnostic;

    impl SolutionDescriptor {
        /// Parses a JSON solution manifest.
        ///
        /// ```json
        /// { "projects": [ { "name": "App", "documents": ["app.cs"], "references": ["Lib"] } ] }
        /// ```
        pub fn from_json(json: &str) -> Result<Self> {
            serde_json::from_str(json).map_err(|e| WorkspaceError::WorkspaceLoad {
                diagnostics: vec![Diagnostic::error(format!("invalid solution manifest: {e}"))],
            })
        }

        /// Reads a JSON manifest from disk. Relative document paths are
        /// resolved against the manifest's directory.
        pub fn read_from_file(path: &Path) -> Result<Self> {
            let text = std::fs::read_to_string(path).map_err(|e| WorkspaceError::WorkspaceLoad {
                diagnostics: vec![
                    Diagnostic::error(format!("failed to read {}: {e}", path.display()))
                        .with_path(path.into()),
                ],
            })?;

            let mut solution = Self::from_json(&text)?;
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            for project in &mut solution.projects {
                for document in &mut project.documents {
                    if document.is_relative() {
                        *document = base.join(&*document);
                    }
                }
            }
            solution.path = Some(path.to_path_buf());
            Ok(solution)
        }

        pub fn to_json(&self) -> Result<String> {
            serde_json::to_string_pretty(self).map_err(|e| WorkspaceError::WorkspaceLoad {
                diagnostics: vec![Diagnostic::error(format!(
                    "failed to serialize solution manifest: {e}"
                ))],
            })
        }
    }
}
