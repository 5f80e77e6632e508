//! The outline toolchain: a reference [`ToolchainAdapter`].
//!
//! Understands the declaration skeleton of brace-delimited languages
//! (`namespace`, `class`, `struct`, `interface`, `enum`, `record`, `fn`) and
//! nothing else. Expressions, types and statements are skipped. Good enough
//! for structural queries, and for exercising the cache without a real
//! compiler behind it.

mod binder;
mod lexer;
mod parser;

use std::path::Path;

pub use binder::bind_outline;
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::parse_outline;

use super::{BindOutput, BindUnit, ParseOutput, SymbolTable, ToolchainAdapter};

#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineToolchain;

impl OutlineToolchain {
    pub fn new() -> Self {
        Self
    }
}

impl ToolchainAdapter for OutlineToolchain {
    fn name(&self) -> &str {
        "outline"
    }

    fn parse(&self, path: &Path, text: &str) -> ParseOutput {
        parse_outline(path, text)
    }

    fn bind(
        &self,
        project: &str,
        units: &[BindUnit<'_>],
        references: &[&SymbolTable],
    ) -> BindOutput {
        bind_outline(project, units, references)
    }
}
