//! Symbol tables produced by the bind step.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use text_size::TextRange;

use crate::syntax::NodeKind;

/// A bound declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: SmolStr,
    pub qualified_name: SmolStr,
    pub kind: NodeKind,
    pub path: Arc<Path>,
    pub range: TextRange,
}

/// Symbols of one project keyed by qualified name, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    project: SmolStr,
    symbols: IndexMap<SmolStr, Symbol>,
}

impl SymbolTable {
    pub fn new(project: impl Into<SmolStr>) -> Self {
        Self {
            project: project.into(),
            symbols: IndexMap::new(),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Inserts a symbol unless its qualified name is taken.
    ///
    /// On conflict the table is left unchanged and the existing symbol is
    /// returned.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), &Symbol> {
        use indexmap::map::Entry;

        match self.symbols.entry(symbol.qualified_name.clone()) {
            Entry::Occupied(existing) => Err(existing.into_mut()),
            Entry::Vacant(slot) => {
                slot.insert(symbol);
                Ok(())
            }
        }
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Symbol> {
        self.symbols.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.symbols.contains_key(qualified_name)
    }

    /// All symbols whose simple name matches, in declaration order.
    pub fn lookup<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Symbol> + 'a {
        self.symbols.values().filter(move |symbol| symbol.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
