use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::{Digest, LineIndex};
use crate::source::SourceDocumentStore;
use crate::syntax::SyntaxTree;
use crate::toolchain::{Diagnostic, SymbolTable};

/// One document as it was compiled.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub(super) path: Arc<Path>,
    pub(super) version: u64,
    pub(super) tree: SyntaxTree,
    pub(super) line_index: LineIndex,
}

impl ParsedDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn path_arc(&self) -> Arc<Path> {
        Arc::clone(&self.path)
    }

    /// The document version this tree was parsed from.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }
}

/// An immutable compilation of one project.
///
/// Identified by project and [`Digest`]; a newer digest means a new snapshot,
/// never a mutated one. Holds the snapshots of its direct references, so a
/// snapshot keeps its whole dependency closure alive.
#[derive(Debug)]
pub struct CompilationSnapshot {
    pub(super) project: SmolStr,
    pub(super) digest: Digest,
    pub(super) sequence: u64,
    pub(super) documents: Vec<ParsedDocument>,
    pub(super) symbols: SymbolTable,
    pub(super) diagnostics: Vec<Diagnostic>,
    pub(super) references: Vec<Arc<CompilationSnapshot>>,
}

impl CompilationSnapshot {
    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn digest(&self) -> Digest {
        self.digest
    }

    /// Build order within the cache; later builds have larger numbers.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Parsed documents in project order.
    pub fn documents(&self) -> &[ParsedDocument] {
        &self.documents
    }

    pub fn document(&self, path: &Path) -> Option<&ParsedDocument> {
        self.documents.iter().find(|d| d.path() == path)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Non-error diagnostics produced while building this project.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Snapshots of the directly referenced projects.
    pub fn references(&self) -> &[Arc<CompilationSnapshot>] {
        &self.references
    }

    /// This snapshot and everything it references, dependencies first,
    /// each project once.
    pub fn transitive(&self) -> Vec<&CompilationSnapshot> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        collect_transitive(self, &mut seen, &mut order);
        order
    }

    /// Whether every document of the closure is still at the version this
    /// snapshot was built from.
    pub fn is_current(&self, store: &SourceDocumentStore) -> bool {
        self.documents
            .iter()
            .all(|doc| store.current_version(doc.path()).ok() == Some(doc.version()))
            && self.references.iter().all(|r| r.is_current(store))
    }
}

fn collect_transitive<'a>(
    snapshot: &'a CompilationSnapshot,
    seen: &mut FxHashSet<&'a str>,
    order: &mut Vec<&'a CompilationSnapshot>,
) {
    if !seen.insert(snapshot.project()) {
        return;
    }
    for reference in &snapshot.references {
        collect_transitive(reference, seen, order);
    }
    order.push(snapshot);
}
