//! Toolchain adapters — the compiler backend seam.
//!
//! The cache never parses or binds anything itself. It hands document text to
//! a [`ToolchainAdapter`] and keeps whatever comes back. Any backend that can
//! produce a [`SyntaxTree`] per document and a [`SymbolTable`] per project
//! plugs in here; it is injected into the workspace once, at host startup.
//!
//! [`OutlineToolchain`] is the bundled reference backend.

mod diagnostics;
pub mod outline;
mod symbols;

use std::path::Path;

pub use diagnostics::{Diagnostic, Severity, codes, render_diagnostics};
pub use outline::OutlineToolchain;
pub use symbols::{Symbol, SymbolTable};

use crate::base::LineIndex;
use crate::syntax::SyntaxTree;

/// Result of parsing one document.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    pub tree: SyntaxTree,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of binding the trees of one project.
#[derive(Clone, Debug, Default)]
pub struct BindOutput {
    pub symbols: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// One parsed document handed to [`ToolchainAdapter::bind`].
#[derive(Clone, Copy, Debug)]
pub struct BindUnit<'a> {
    pub path: &'a Path,
    pub tree: &'a SyntaxTree,
    pub line_index: &'a LineIndex,
}

/// A compiler backend.
///
/// `parse` is called once per document and may run on several threads at
/// once; `bind` is called once per project build, after every document of
/// the project parsed.
pub trait ToolchainAdapter: Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &str;

    fn parse(&self, path: &Path, text: &str) -> ParseOutput;

    /// Binds `units` (in document order) against the symbol tables of the
    /// project's direct references.
    fn bind(
        &self,
        project: &str,
        units: &[BindUnit<'_>],
        references: &[&SymbolTable],
    ) -> BindOutput;
}
