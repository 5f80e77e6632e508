//! Diagnostics reported by toolchain adapters.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::base::Span;

/// Severity level of a diagnostic.
///
/// Only [`Severity::Error`] fails a compilation; everything else is attached
/// to the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Hint => "hint",
        })
    }
}

/// A diagnostic message with an optional location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Error/warning code (e.g., "Q0001").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
    /// The document this diagnostic belongs to, if any.
    pub path: Option<Arc<Path>>,
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            path: None,
            span: None,
        }
    }

    pub fn error(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<Arc<str>>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_path(mut self, path: Arc<Path>) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Diagnostic {
    /// `path:line:col: severity[code]: message`, omitting whatever is unknown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}:", path.display())?;
            if let Some(span) = &self.span {
                write!(f, "{}:", span.start)?;
            }
            f.write_str(" ")?;
        }
        write!(f, "{}", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Renders diagnostics one per line, never truncated.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Standard diagnostic codes produced by the bundled outline toolchain.
///
/// - **Q0001-Q0099**: Syntax errors
/// - **Q0100-Q0199**: Binding errors
/// - **W0001-W0099**: Warnings
pub mod codes {
    /// Unexpected closing brace.
    pub const UNBALANCED_BRACE: &str = "Q0001";
    /// Block still open at end of file.
    pub const UNCLOSED_BLOCK: &str = "Q0002";
    /// Declaration keyword without a name.
    pub const MISSING_NAME: &str = "Q0003";
    /// Token the lexer does not recognize.
    pub const UNKNOWN_TOKEN: &str = "Q0004";
    /// Blocks nested deeper than the parser follows.
    pub const NESTING_TOO_DEEP: &str = "Q0005";
    /// Document longer than a `TextSize` can address (4 GiB).
    pub const DOCUMENT_TOO_LARGE: &str = "Q0006";
    /// Same qualified name declared twice in a project.
    pub const DUPLICATE_DEFINITION: &str = "Q0100";
    /// Declaration hides a symbol from a referenced project.
    pub const SHADOWED_SYMBOL: &str = "W0001";
}
