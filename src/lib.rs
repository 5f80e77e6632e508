//! # quarry-base
//!
//! Project model and compilation cache for language tooling hosts.
//!
//! Hosts describe a solution (projects, their documents, their references),
//! push document text into a store, and ask for compiled snapshots and
//! structural queries. Parsing and binding are delegated to a pluggable
//! [`ToolchainAdapter`]; a reference adapter for brace-delimited languages
//! ships in [`toolchain::outline`].
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! workspace → Workspace facade, ProjectHandle
//!   ↓
//! query     → Declaration filters and lazy declaration walks
//!   ↓
//! compile   → CompilationSnapshot, digest-keyed CompilationCache
//!   ↓
//! project   → Solution descriptors, ProjectSet, loading from disk
//!   ↓
//! toolchain → ToolchainAdapter, diagnostics, symbol tables, outline adapter
//!   ↓
//! source    → Versioned SourceDocumentStore
//!   ↓
//! syntax    → Backend-neutral syntax trees
//!   ↓
//! base      → Digest, Span/Position, LineIndex
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → source → toolchain → project →
// compile → query → workspace)
// ============================================================================

/// Foundation types: digests, positions, line index
pub mod base;

/// Syntax trees produced by toolchain adapters
pub mod syntax;

/// Versioned document storage
pub mod source;

/// Toolchain adapter seam and the bundled outline adapter
pub mod toolchain;

/// Solutions, projects and the reference graph
pub mod project;

/// Compilation snapshots and the cache that builds them
pub mod compile;

/// Structural queries over compiled trees
pub mod query;

/// Top-level facade
pub mod workspace;

pub mod error;

// Re-export commonly needed items
pub use compile::{CacheConfig, CacheStats, CompilationCache, CompilationSnapshot};
pub use error::{Result, WorkspaceError};
pub use project::{ProjectDescriptor, ProjectSet, SolutionDescriptor};
pub use query::{
    Declaration, DeclarationFilter, DeclarationScope, OwnedDeclarations, find_declarations,
};
pub use source::{Document, SourceDocumentStore};
pub use toolchain::{Diagnostic, OutlineToolchain, Severity, ToolchainAdapter};
pub use workspace::{ProjectHandle, Workspace, WorkspaceConfig};

// Re-export foundation types
pub use base::{Digest, LineIndex, Position, Span, TextRange, TextSize};
