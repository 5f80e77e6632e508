use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::WorkspaceConfig;
use crate::compile::{CompilationCache, CompilationSnapshot};
use crate::error::Result;
use crate::project::{ProjectSet, SolutionDescriptor, SolutionLoader};
use crate::query::{DeclarationFilter, DeclarationScope, OwnedDeclarations};
use crate::source::SourceDocumentStore;
use crate::toolchain::ToolchainAdapter;

/// Entry point: owns the document store and the compilation cache, and
/// opens projects against them.
///
/// Edits go through [`store`](Self::store); every handle opened from this
/// workspace sees them on its next call.
pub struct Workspace {
    store: Arc<SourceDocumentStore>,
    cache: Arc<CompilationCache>,
    config: WorkspaceConfig,
}

impl Workspace {
    pub fn new(toolchain: Arc<dyn ToolchainAdapter>, config: WorkspaceConfig) -> Self {
        tracing::debug!(toolchain = toolchain.name(), "workspace created");
        Self {
            store: Arc::new(SourceDocumentStore::new()),
            cache: Arc::new(CompilationCache::new(toolchain, config.cache.clone())),
            config,
        }
    }

    pub fn store(&self) -> &Arc<SourceDocumentStore> {
        &self.store
    }

    pub fn cache(&self) -> &CompilationCache {
        &self.cache
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// A loader that reads documents from disk into this workspace's store.
    pub fn loader(&self) -> SolutionLoader {
        SolutionLoader::new(Arc::clone(&self.store))
    }

    /// Validates the solution's project graph and, with `load_from_disk`,
    /// reads every document the store does not hold yet.
    pub fn open_solution(&self, descriptor: &SolutionDescriptor) -> Result<Arc<ProjectSet>> {
        let projects = ProjectSet::from_descriptor(descriptor)?;

        if self.config.load_from_disk {
            let mut missing: Vec<&Path> = projects
                .iter()
                .flat_map(|p| p.document_paths().iter().map(PathBuf::as_path))
                .filter(|path| !self.store.contains(path))
                .collect();
            missing.sort();
            missing.dedup();
            if !missing.is_empty() {
                self.loader().load_files(&missing)?;
            }
        }

        Ok(Arc::new(projects))
    }

    /// Opens one project of a solution by name, ignoring case.
    ///
    /// Only the name is checked here; reference cycles and build errors
    /// surface from [`ProjectHandle::compilation`].
    pub fn open_project(&self, descriptor: &SolutionDescriptor, name: &str) -> Result<ProjectHandle> {
        let projects = self.open_solution(descriptor)?;
        let name = projects.resolve(name)?.name().to_string();
        tracing::debug!(project = %name, solution = %descriptor.display_name(), "project opened");
        Ok(ProjectHandle {
            name,
            projects,
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        })
    }
}

/// One open project. Cheap to clone; every call reads the current store.
#[derive(Clone)]
pub struct ProjectHandle {
    name: String,
    projects: Arc<ProjectSet>,
    store: Arc<SourceDocumentStore>,
    cache: Arc<CompilationCache>,
}

impl ProjectHandle {
    /// The project's name as spelled in the solution.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn projects(&self) -> &ProjectSet {
        &self.projects
    }

    pub fn compilation(&self) -> Result<Arc<CompilationSnapshot>> {
        self.cache
            .get_compilation(&self.projects, &self.store, &self.name)
    }

    /// Declarations of this project's own documents.
    pub fn declarations(&self, filter: DeclarationFilter) -> Result<OwnedDeclarations> {
        self.declarations_in(filter, DeclarationScope::Project)
    }

    /// Compiles once, then returns a query over that snapshot. Iterating it
    /// walks the trees on demand; edits made afterwards are not seen.
    pub fn declarations_in(
        &self,
        filter: DeclarationFilter,
        scope: DeclarationScope,
    ) -> Result<OwnedDeclarations> {
        let snapshot = self.compilation()?;
        Ok(OwnedDeclarations::new(snapshot, filter, scope))
    }

    /// Class-like declarations across the project and everything it references.
    pub fn classes(&self) -> Result<OwnedDeclarations> {
        self.declarations_in(DeclarationFilter::class_like(), DeclarationScope::Transitive)
    }
}

impl std::fmt::Debug for ProjectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectHandle")
            .field("name", &self.name)
            .field("projects", &self.projects.len())
            .finish()
    }
}
