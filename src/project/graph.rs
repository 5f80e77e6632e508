use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::descriptor::SolutionDescriptor;
use crate::error::{Result, WorkspaceError};
use crate::source::{Document, SourceDocumentStore};

/// Case-insensitive lookup key for project names.
pub(crate) fn project_key(name: &str) -> String {
    name.to_lowercase()
}

/// A project: its documents (by path) and the projects it references (by name).
///
/// Documents live in the [`SourceDocumentStore`]; references are names,
/// resolved through the owning [`ProjectSet`]. Neither is owned here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectGraph {
    name: SmolStr,
    documents: Vec<PathBuf>,
    references: IndexSet<SmolStr>,
}

impl ProjectGraph {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document_paths(&self) -> &[PathBuf] {
        &self.documents
    }

    /// The project's documents, read from `store` in project order.
    pub fn documents(&self, store: &SourceDocumentStore) -> Result<Vec<Document>> {
        store.capture(self.documents.iter().map(PathBuf::as_path))
    }

    /// Names of directly referenced projects, as spelled by those projects.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(SmolStr::as_str)
    }

    pub fn contains_document(&self, path: &Path) -> bool {
        self.documents.iter().any(|p| p == path)
    }
}

/// Every project of one solution, validated.
///
/// Construction fails on duplicate names and on references to unknown
/// projects. Cycles are legal to construct and are reported by
/// [`compilation_order`](Self::compilation_order).
#[derive(Debug, Clone, Default)]
pub struct ProjectSet {
    projects: IndexMap<String, ProjectGraph>,
}

enum Mark {
    Visiting,
    Done,
}

impl ProjectSet {
    pub fn from_descriptor(descriptor: &SolutionDescriptor) -> Result<Self> {
        let mut projects = IndexMap::with_capacity(descriptor.projects.len());
        for project in &descriptor.projects {
            let key = project_key(&project.name);
            if projects.contains_key(&key) {
                return Err(WorkspaceError::DuplicateProject {
                    name: project.name.clone(),
                });
            }
            projects.insert(
                key,
                ProjectGraph {
                    name: project.name.as_str().into(),
                    documents: project.documents.clone(),
                    references: IndexSet::new(),
                },
            );
        }

        for project in &descriptor.projects {
            let mut references = IndexSet::with_capacity(project.references.len());
            for reference in &project.references {
                let target = projects.get(&project_key(reference)).ok_or_else(|| {
                    WorkspaceError::DanglingReference {
                        project: project.name.clone(),
                        reference: reference.clone(),
                    }
                })?;
                references.insert(target.name.clone());
            }
            if let Some(graph) = projects.get_mut(&project_key(&project.name)) {
                graph.references = references;
            }
        }

        tracing::debug!(
            solution = %descriptor.display_name(),
            projects = projects.len(),
            "project graph built"
        );
        Ok(Self { projects })
    }

    /// Looks a project up by name, ignoring case.
    pub fn resolve(&self, name: &str) -> Result<&ProjectGraph> {
        self.projects
            .get(&project_key(name))
            .ok_or_else(|| WorkspaceError::project_not_found(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(&project_key(name))
    }

    /// Projects in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectGraph> {
        self.projects.values()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Projects that list `path` among their documents.
    pub fn owners_of(&self, path: &Path) -> Vec<&ProjectGraph> {
        self.iter().filter(|p| p.contains_document(path)).collect()
    }

    /// The transitive closure of `name` in dependency order: every project
    /// appears after all projects it references, and `name` itself is last.
    ///
    /// Fails with `CyclicReference` if the closure contains a cycle.
    pub fn compilation_order(&self, name: &str) -> Result<Vec<&ProjectGraph>> {
        let root = self.resolve(name)?;
        let mut marks: FxHashMap<&str, Mark> = FxHashMap::default();
        let mut path = Vec::new();
        let mut order = Vec::new();
        self.visit(root, &mut marks, &mut path, &mut order)?;
        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        project: &'a ProjectGraph,
        marks: &mut FxHashMap<&'a str, Mark>,
        path: &mut Vec<&'a ProjectGraph>,
        order: &mut Vec<&'a ProjectGraph>,
    ) -> Result<()> {
        match marks.get(project.name()) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path
                    .iter()
                    .position(|p| p.name == project.name)
                    .unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[start..].iter().map(|p| p.name.to_string()).collect();
                cycle.push(project.name.to_string());
                return Err(WorkspaceError::CyclicReference { cycle });
            }
            None => {}
        }

        marks.insert(project.name(), Mark::Visiting);
        path.push(project);
        for reference in project.references() {
            let target = self.resolve(reference)?;
            self.visit(target, marks, path, order)?;
        }
        path.pop();
        marks.insert(project.name(), Mark::Done);
        order.push(project);
        Ok(())
    }
}
