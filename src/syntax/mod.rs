//! Syntax: the parsed tree every toolchain adapter produces.
//!
//! Trees are plain owned values. Adapters translate their own syntax into
//! [`SyntaxNode`]s tagged with a [`NodeKind`]; the query engine only ever
//! sees this representation.

mod tree;

pub use tree::{NodeKind, Preorder, SyntaxNode, SyntaxTree, Visit};
