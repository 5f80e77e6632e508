use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::descriptor::{ProjectDescriptor, SolutionDescriptor};
use crate::error::{Result, WorkspaceError};
use crate::source::SourceDocumentStore;
use crate::toolchain::Diagnostic;

/// Loads solution documents from disk into a [`SourceDocumentStore`].
///
/// The store itself does no I/O; this is the collaborator that fills it.
pub struct SolutionLoader {
    store: Arc<SourceDocumentStore>,
}

impl SolutionLoader {
    pub fn new(store: Arc<SourceDocumentStore>) -> Self {
        Self { store }
    }

    /// Reads every document the solution names. Documents already in the
    /// store are reloaded (and get a new version).
    ///
    /// All read failures are collected; if there are any, nothing is
    /// reported as loaded and the error lists every failing path.
    pub fn load_solution(&self, solution: &SolutionDescriptor) -> Result<usize> {
        let mut paths: Vec<&Path> = solution
            .projects
            .iter()
            .flat_map(|p| p.documents.iter().map(PathBuf::as_path))
            .collect();
        paths.sort();
        paths.dedup();
        self.load_files(&paths)
    }

    pub fn load_project(&self, project: &ProjectDescriptor) -> Result<usize> {
        let paths: Vec<&Path> = project.documents.iter().map(PathBuf::as_path).collect();
        self.load_files(&paths)
    }

    /// Reads files into the store. Returns how many were loaded.
    pub fn load_files(&self, paths: &[&Path]) -> Result<usize> {
        let mut loaded = Vec::with_capacity(paths.len());
        let mut diagnostics = Vec::new();

        for path in paths {
            match std::fs::read_to_string(path) {
                Ok(text) => loaded.push((path.to_path_buf(), text)),
                Err(e) => diagnostics.push(
                    Diagnostic::error(format!("failed to read {}: {e}", path.display()))
                        .with_path(Arc::from(*path)),
                ),
            }
        }

        if !diagnostics.is_empty() {
            tracing::warn!(failed = diagnostics.len(), "solution documents failed to load");
            return Err(WorkspaceError::WorkspaceLoad { diagnostics });
        }

        let count = loaded.len();
        for (path, text) in loaded {
            self.store.put_document(path, text);
        }
        tracing::debug!(count, "documents loaded");
        Ok(count)
    }
}

/// Builds a project descriptor from every file under `root` whose extension
/// is in `extensions`. Paths are sorted so the document order is stable.
pub fn discover_project(
    name: impl Into<String>,
    root: &Path,
    extensions: &[&str],
) -> Result<ProjectDescriptor> {
    if !root.is_dir() {
        return Err(WorkspaceError::WorkspaceLoad {
            diagnostics: vec![Diagnostic::error(format!(
                "Directory not found: {}",
                root.display()
            ))],
        });
    }

    let mut documents = Vec::new();
    let mut diagnostics = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let matches = entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| extensions.contains(&ext));
                if matches {
                    documents.push(entry.into_path());
                }
            }
            Ok(_) => {}
            Err(e) => diagnostics.push(Diagnostic::error(format!("failed to scan: {e}"))),
        }
    }

    if !diagnostics.is_empty() {
        return Err(WorkspaceError::WorkspaceLoad { diagnostics });
    }

    documents.sort();
    Ok(ProjectDescriptor::new(name).with_documents(documents))
}
