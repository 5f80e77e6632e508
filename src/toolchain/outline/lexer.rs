//! Logos-based lexer for the outline toolchain
//!
//! Recognizes just enough of a brace-delimited language to find declarations:
//! declaration keywords, identifiers, braces and semicolons. Comments and
//! string literals are lexed so braces inside them are never counted.

use logos::Logos;
use text_size::TextRange;

use crate::base::text_offset;

/// Token kinds the outline parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Literal,
    NamespaceKw,
    ClassKw,
    StructKw,
    InterfaceKw,
    EnumKw,
    RecordKw,
    FunctionKw,
    Ident,
    LBrace,
    RBrace,
    Semi,
    Dot,
    Punct,
    Error,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_declaration_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::NamespaceKw
                | TokenKind::ClassKw
                | TokenKind::StructKw
                | TokenKind::InterfaceKw
                | TokenKind::EnumKw
                | TokenKind::RecordKw
                | TokenKind::FunctionKw
        )
    }
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let span = self.inner.span();
        let range = TextRange::new(text_offset(span.start), text_offset(span.end));

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };

        Some(Token {
            kind,
            text: self.inner.slice(),
            range,
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Literal,

    #[token("namespace")]
    #[token("package")]
    #[token("module")]
    Namespace,

    #[token("class")]
    Class,

    #[token("struct")]
    Struct,

    #[token("interface")]
    #[token("trait")]
    Interface,

    #[token("enum")]
    Enum,

    #[token("record")]
    Record,

    #[token("fn")]
    #[token("func")]
    #[token("function")]
    Function,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9][A-Za-z0-9_]*")]
    Number,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semi,

    #[token(".")]
    Dot,

    #[token("/")]
    #[regex(r#"[^ \t\r\n\fA-Za-z0-9_{};."'/]"#)]
    Punct,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => TokenKind::Whitespace,
            LogosToken::LineComment | LogosToken::BlockComment => TokenKind::Comment,
            LogosToken::Literal | LogosToken::Number => TokenKind::Literal,
            LogosToken::Namespace => TokenKind::NamespaceKw,
            LogosToken::Class => TokenKind::ClassKw,
            LogosToken::Struct => TokenKind::StructKw,
            LogosToken::Interface => TokenKind::InterfaceKw,
            LogosToken::Enum => TokenKind::EnumKw,
            LogosToken::Record => TokenKind::RecordKw,
            LogosToken::Function => TokenKind::FunctionKw,
            LogosToken::Ident => TokenKind::Ident,
            LogosToken::LBrace => TokenKind::LBrace,
            LogosToken::RBrace => TokenKind::RBrace,
            LogosToken::Semi => TokenKind::Semi,
            LogosToken::Dot => TokenKind::Dot,
            LogosToken::Punct => TokenKind::Punct,
        }
    }
}
