use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;
use text_size::TextRange;

use super::filter::DeclarationFilter;
use crate::base::Span;
use crate::compile::{CompilationSnapshot, ParsedDocument};
use crate::syntax::{NodeKind, Preorder};

/// How far a declaration query reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarationScope {
    /// Only the documents of the queried project.
    #[default]
    Project,
    /// The queried project and every project it references, transitively.
    Transitive,
}

/// A named node found by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: NodeKind,
    pub name: SmolStr,
    /// Dot-joined names of the enclosing declarations and this one.
    pub qualified_name: SmolStr,
    pub range: TextRange,
    /// `range` as 0-based lines and columns.
    pub span: Span,
    pub path: Arc<Path>,
    pub project: SmolStr,
    /// 0 for nodes at the root of their document.
    pub depth: usize,
}

/// The result of [`find_declarations`]: a finite sequence that walks the
/// snapshot's trees each time it is iterated.
#[derive(Debug, Clone)]
pub struct Declarations<'a> {
    projects: Vec<&'a CompilationSnapshot>,
    filter: DeclarationFilter,
}

impl<'a> Declarations<'a> {
    /// Starts a fresh walk.
    pub fn iter(&self) -> DeclarationIter<'_> {
        DeclarationIter::new(self.projects.clone(), &self.filter)
    }

    /// Projects covered by the query, in walk order.
    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(|p| p.project())
    }
}

impl<'s> IntoIterator for &'s Declarations<'_> {
    type Item = Declaration;
    type IntoIter = DeclarationIter<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A declaration query that holds its snapshot, so it can outlive the call
/// that produced it. Like [`Declarations`], every [`iter`](Self::iter) walks
/// the trees afresh; nothing is collected up front.
#[derive(Debug, Clone)]
pub struct OwnedDeclarations {
    snapshot: Arc<CompilationSnapshot>,
    filter: DeclarationFilter,
    scope: DeclarationScope,
}

impl OwnedDeclarations {
    pub fn new(
        snapshot: Arc<CompilationSnapshot>,
        filter: DeclarationFilter,
        scope: DeclarationScope,
    ) -> Self {
        Self {
            snapshot,
            filter,
            scope,
        }
    }

    /// The snapshot the query walks. Later edits do not change it.
    pub fn snapshot(&self) -> &Arc<CompilationSnapshot> {
        &self.snapshot
    }

    pub fn scope(&self) -> DeclarationScope {
        self.scope
    }

    pub fn iter(&self) -> DeclarationIter<'_> {
        DeclarationIter::new(scoped(&self.snapshot, self.scope), &self.filter)
    }
}

impl<'s> IntoIterator for &'s OwnedDeclarations {
    type Item = Declaration;
    type IntoIter = DeclarationIter<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn scoped(snapshot: &CompilationSnapshot, scope: DeclarationScope) -> Vec<&CompilationSnapshot> {
    match scope {
        DeclarationScope::Project => vec![snapshot],
        DeclarationScope::Transitive => snapshot.transitive(),
    }
}

/// Queries the trees of `snapshot` (and, for [`DeclarationScope::Transitive`],
/// of its references) for named nodes accepted by `filter`.
///
/// Order is deterministic: projects with dependencies first, documents in
/// project order, nodes in pre-order.
pub fn find_declarations(
    snapshot: &CompilationSnapshot,
    filter: DeclarationFilter,
    scope: DeclarationScope,
) -> Declarations<'_> {
    Declarations {
        projects: scoped(snapshot, scope),
        filter,
    }
}

/// Iterator returned by [`Declarations::iter`] and [`OwnedDeclarations::iter`].
pub struct DeclarationIter<'s> {
    filter: &'s DeclarationFilter,
    projects: std::vec::IntoIter<&'s CompilationSnapshot>,
    project: Option<(&'s CompilationSnapshot, std::slice::Iter<'s, ParsedDocument>)>,
    document: Option<(&'s str, &'s ParsedDocument, Preorder<'s>)>,
}

impl<'s> DeclarationIter<'s> {
    fn new(projects: Vec<&'s CompilationSnapshot>, filter: &'s DeclarationFilter) -> Self {
        Self {
            filter,
            projects: projects.into_iter(),
            project: None,
            document: None,
        }
    }
}

impl Iterator for DeclarationIter<'_> {
    type Item = Declaration;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((project, document, walk)) = &mut self.document {
                for visit in walk.by_ref() {
                    let Some(name) = visit.node.name.as_ref() else {
                        continue;
                    };
                    if !self.filter.matches(&visit) {
                        continue;
                    }
                    return Some(Declaration {
                        kind: visit.node.kind.clone(),
                        name: name.clone(),
                        qualified_name: visit.qualified_name.as_str().into(),
                        range: visit.node.range,
                        span: document.line_index().span(visit.node.range),
                        path: document.path_arc(),
                        project: SmolStr::new(*project),
                        depth: visit.depth,
                    });
                }
                self.document = None;
            }

            if let Some((snapshot, documents)) = &mut self.project {
                if let Some(document) = documents.next() {
                    let project = CompilationSnapshot::project(*snapshot);
                    self.document = Some((project, document, document.tree().preorder()));
                    continue;
                }
                self.project = None;
            }

            let snapshot = self.projects.next()?;
            self.project = Some((snapshot, snapshot.documents().iter()));
        }
    }
}
