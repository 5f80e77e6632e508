//! Outline parser: declarations and their nesting, nothing else.
//!
//! ```text
//! items  := item*
//! item   := DECL_KW name? header (block | ';')?  |  block  |  <any other token>
//! name   := IDENT ('.' IDENT)*
//! header := <tokens up to the next '{', ';' or '}'>
//! block  := '{' items '}'
//! ```
//!
//! Blocks that do not belong to a declaration (method bodies, initializers)
//! are transparent: declarations found inside them are attached to the
//! nearest enclosing declaration. A top-level namespace terminated by `;`
//! owns every item that follows it in the file; elsewhere it is an ordinary
//! declaration without a body.
//!
//! Blocks nested deeper than [`MAX_NESTING`] are skipped with an error.

use std::path::Path;
use std::sync::Arc;

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::lexer::{TokenKind, tokenize};
use crate::base::LineIndex;
use crate::syntax::{NodeKind, SyntaxNode, SyntaxTree};
use crate::toolchain::{Diagnostic, ParseOutput, codes};

#[derive(Debug, Clone)]
struct Tok {
    kind: TokenKind,
    text: SmolStr,
    range: TextRange,
}

/// How a list of items ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    /// End of file.
    Eof,
    /// A `}` closing the block opened at the given range.
    Brace(TextRange),
}

/// Deepest block nesting the parser descends into.
pub const MAX_NESTING: usize = 128;

pub(super) struct Parser<'a> {
    tokens: Vec<Tok>,
    pos: usize,
    /// Open blocks around the current position.
    depth: usize,
    /// Set once a file-scoped `namespace X;` has been seen.
    file_scoped: bool,
    path: Arc<Path>,
    line_index: &'a LineIndex,
    diagnostics: Vec<Diagnostic>,
}

/// Parses `text` into an outline tree.
pub fn parse_outline(path: &Path, text: &str) -> ParseOutput {
    if TextSize::try_from(text.len()).is_err() {
        return too_large(path, text.len());
    }
    let line_index = LineIndex::new(text);
    let mut parser = Parser::new(path, text, &line_index);
    let items = parser.parse_items(Terminator::Eof).0;
    ParseOutput {
        tree: SyntaxTree::new(items, TextSize::of(text)),
        diagnostics: parser.diagnostics,
    }
}

fn too_large(path: &Path, len: usize) -> ParseOutput {
    ParseOutput {
        tree: SyntaxTree::default(),
        diagnostics: vec![
            Diagnostic::error(format!(
                "document is {len} bytes; at most {} are supported",
                u32::MAX
            ))
            .with_code(codes::DOCUMENT_TOO_LARGE)
            .with_path(Arc::from(path)),
        ],
    }
}

impl<'a> Parser<'a> {
    fn new(path: &Path, text: &str, line_index: &'a LineIndex) -> Self {
        let path: Arc<Path> = Arc::from(path);
        let mut diagnostics = Vec::new();
        let mut tokens = Vec::new();

        for token in tokenize(text) {
            match token.kind {
                kind if kind.is_trivia() => {}
                TokenKind::Error => diagnostics.push(
                    Diagnostic::warning(format!("unrecognized input `{}`", token.text.trim()))
                        .with_code(codes::UNKNOWN_TOKEN)
                        .with_path(Arc::clone(&path))
                        .with_span(line_index.span(token.range)),
                ),
                kind => tokens.push(Tok {
                    kind,
                    text: token.text.into(),
                    range: token.range,
                }),
            }
        }

        Self {
            tokens,
            pos: 0,
            depth: 0,
            file_scoped: false,
            path,
            line_index,
            diagnostics,
        }
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Tok> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&mut self, code: &'static str, message: String, range: TextRange) {
        self.diagnostics.push(
            Diagnostic::error(message)
                .with_code(code)
                .with_path(Arc::clone(&self.path))
                .with_span(self.line_index.span(range)),
        );
    }

    /// Parses the items of the block opened at `open`, or skips the block if
    /// it is nested too deeply.
    fn parse_block(&mut self, open: TextRange) -> (Vec<SyntaxNode>, TextSize) {
        if self.depth >= MAX_NESTING {
            self.error(
                codes::NESTING_TOO_DEEP,
                format!("blocks nested more than {MAX_NESTING} deep are not parsed"),
                open,
            );
            return (Vec::new(), self.skip_block(open));
        }
        self.depth += 1;
        let parsed = self.parse_items(Terminator::Brace(open));
        self.depth -= 1;
        parsed
    }

    /// Skips to the `}` matching an already consumed `{`.
    fn skip_block(&mut self, open: TextRange) -> TextSize {
        let mut open_blocks = 1usize;
        while let Some(token) = self.bump() {
            match token.kind {
                TokenKind::LBrace => open_blocks += 1,
                TokenKind::RBrace => {
                    open_blocks -= 1;
                    if open_blocks == 0 {
                        return token.range.end();
                    }
                }
                _ => {}
            }
        }
        self.error(
            codes::UNCLOSED_BLOCK,
            "block is never closed".to_string(),
            open,
        );
        self.tokens.last().map_or(open.end(), |t| t.range.end())
    }

    /// Parses items until `terminator`. Returns the items and the offset
    /// where the list ended (after the closing brace, if any).
    fn parse_items(&mut self, terminator: Terminator) -> (Vec<SyntaxNode>, TextSize) {
        let mut items = Vec::new();

        loop {
            let Some(kind) = self.peek_kind() else {
                if let Terminator::Brace(open) = terminator {
                    self.error(
                        codes::UNCLOSED_BLOCK,
                        "block is never closed".to_string(),
                        open,
                    );
                }
                let end = self.tokens.last().map_or(TextSize::new(0), |t| t.range.end());
                return (items, end);
            };

            match kind {
                TokenKind::RBrace => {
                    let Some(close) = self.bump() else { continue };
                    match terminator {
                        Terminator::Brace(_) => return (items, close.range.end()),
                        Terminator::Eof => self.error(
                            codes::UNBALANCED_BRACE,
                            "unexpected `}`".to_string(),
                            close.range,
                        ),
                    }
                }
                TokenKind::LBrace => {
                    let Some(open) = self.bump() else { continue };
                    let (nested, _) = self.parse_block(open.range);
                    items.extend(nested);
                }
                kind if kind.is_declaration_keyword() => {
                    if let Some(node) = self.parse_declaration() {
                        items.push(node);
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Parses one declaration starting at its keyword. Returns `None` when
    /// the keyword turned out to be a modifier of the declaration after it
    /// (`enum class Color`).
    fn parse_declaration(&mut self) -> Option<SyntaxNode> {
        let keyword = self.bump()?;

        if self.peek_kind().is_some_and(TokenKind::is_declaration_keyword) {
            return None;
        }

        let kind = node_kind(keyword.kind);
        let name = self.parse_name();
        if name.is_none() {
            self.error(
                codes::MISSING_NAME,
                format!("`{}` declaration has no name", keyword.text),
                keyword.range,
            );
        }

        let mut end = self
            .tokens
            .get(self.pos.saturating_sub(1))
            .map_or(keyword.range.end(), |t| t.range.end());
        let mut children = Vec::new();

        // Header: skip to the body, the terminating `;`, or the enclosing `}`.
        while let Some(next) = self.peek_kind() {
            match next {
                TokenKind::LBrace => {
                    let open = self.bump()?;
                    let (body, close) = self.parse_block(open.range);
                    children = body;
                    end = close;
                    break;
                }
                TokenKind::Semi => {
                    let semi = self.bump()?;
                    end = semi.range.end();
                    if kind == NodeKind::Namespace && self.depth == 0 && !self.file_scoped {
                        self.file_scoped = true;
                        let (rest, eof) = self.parse_items(Terminator::Eof);
                        children = rest;
                        end = end.max(eof);
                    }
                    break;
                }
                TokenKind::RBrace => break,
                _ if next.is_declaration_keyword() && self.nth_kind(1) == Some(TokenKind::Ident) => {
                    // A new declaration starts before this one found a body.
                    break;
                }
                _ => {
                    let token = self.bump()?;
                    end = token.range.end();
                }
            }
        }

        let mut node = SyntaxNode::new(kind, TextRange::new(keyword.range.start(), end))
            .with_children(children);
        node.name = name;
        Some(node)
    }

    fn parse_name(&mut self) -> Option<SmolStr> {
        if self.peek_kind() != Some(TokenKind::Ident) {
            return None;
        }
        let mut name = self.bump()?.text.to_string();
        while self.peek_kind() == Some(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident)
        {
            self.bump();
            let part = self.bump()?;
            name.push('.');
            name.push_str(&part.text);
        }
        Some(name.into())
    }
}

fn node_kind(keyword: TokenKind) -> NodeKind {
    match keyword {
        TokenKind::NamespaceKw => NodeKind::Namespace,
        TokenKind::ClassKw => NodeKind::Class,
        TokenKind::StructKw => NodeKind::Struct,
        TokenKind::InterfaceKw => NodeKind::Interface,
        TokenKind::EnumKw => NodeKind::Enum,
        TokenKind::RecordKw => NodeKind::Record,
        TokenKind::FunctionKw => NodeKind::Function,
        other => NodeKind::Other(format!("{other:?}").into()),
    }
}
