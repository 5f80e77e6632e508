//! Binds outline trees into a project symbol table.

use std::path::Path;
use std::sync::Arc;

use crate::syntax::NodeKind;
use crate::toolchain::{BindOutput, BindUnit, Diagnostic, Symbol, SymbolTable, codes};

/// Collects every named declaration of a project.
///
/// Class-like declarations must have unique qualified names within the
/// project (an error otherwise). Namespaces and functions may repeat; the
/// first occurrence is kept. A class-like declaration whose qualified name
/// also exists in a referenced project gets a warning.
pub fn bind_outline(
    project: &str,
    units: &[BindUnit<'_>],
    references: &[&SymbolTable],
) -> BindOutput {
    let mut symbols = SymbolTable::new(project);
    let mut diagnostics = Vec::new();

    for unit in units {
        let path: Arc<Path> = Arc::from(unit.path);

        for visit in unit.tree.preorder() {
            let Some(name) = visit.node.name.clone() else {
                continue;
            };
            let kind = visit.node.kind.clone();
            let symbol = Symbol {
                name,
                qualified_name: visit.qualified_name.as_str().into(),
                kind: kind.clone(),
                path: Arc::clone(&path),
                range: visit.node.range,
            };

            if kind.is_class_like() {
                if let Some(owner) = references
                    .iter()
                    .find(|table| table.contains(&visit.qualified_name))
                {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "`{}` hides a declaration from project {}",
                            visit.qualified_name,
                            owner.project()
                        ))
                        .with_code(codes::SHADOWED_SYMBOL)
                        .with_path(Arc::clone(&path))
                        .with_span(unit.line_index.span(visit.node.range)),
                    );
                }
            }

            if let Err(existing) = symbols.insert(symbol) {
                let clash = kind.is_class_like() || existing.kind.is_class_like();
                if clash && kind != NodeKind::Namespace {
                    diagnostics.push(
                        Diagnostic::error(format!(
                            "`{}` is already defined in {}",
                            visit.qualified_name,
                            existing.path.display()
                        ))
                        .with_code(codes::DUPLICATE_DEFINITION)
                        .with_path(Arc::clone(&path))
                        .with_span(unit.line_index.span(visit.node.range)),
                    );
                }
            }
        }
    }

    BindOutput {
        symbols,
        diagnostics,
    }
}
