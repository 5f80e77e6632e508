//! Declaration predicates.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::syntax::{NodeKind, Visit};

type Predicate = dyn Fn(&Visit<'_>) -> bool + Send + Sync;

/// Selects which tree nodes a declaration query yields.
///
/// Filters are cheap to clone and compose with [`and`](Self::and) and
/// [`or`](Self::or). Unnamed nodes are never yielded, whatever the filter.
#[derive(Clone)]
pub struct DeclarationFilter {
    predicate: Arc<Predicate>,
    label: SmolStr,
}

impl DeclarationFilter {
    /// Every named node.
    pub fn all() -> Self {
        Self::labelled("all", |_| true)
    }

    /// Classes, structs, interfaces, enums and records.
    pub fn class_like() -> Self {
        Self::labelled("class_like", |visit| visit.node.kind.is_class_like())
    }

    /// Nodes not nested inside a type. Namespaces do not count as nesting.
    pub fn top_level() -> Self {
        Self::labelled("top_level", |visit| !visit.in_type)
    }

    pub fn kind(kind: NodeKind) -> Self {
        let label = format!("kind({})", kind.as_str());
        Self::labelled(label, move |visit| visit.node.kind == kind)
    }

    /// Nodes whose simple name equals `name`.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        let label = format!("named({name})");
        Self::labelled(label, move |visit| visit.node.name() == Some(name.as_str()))
    }

    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Visit<'_>) -> bool + Send + Sync + 'static,
    {
        Self::labelled("custom", predicate)
    }

    pub fn and(self, other: Self) -> Self {
        let label = format!("({} and {})", self.label, other.label);
        Self::labelled(label, move |visit| self.matches(visit) && other.matches(visit))
    }

    pub fn or(self, other: Self) -> Self {
        let label = format!("({} or {})", self.label, other.label);
        Self::labelled(label, move |visit| self.matches(visit) || other.matches(visit))
    }

    pub fn matches(&self, visit: &Visit<'_>) -> bool {
        (self.predicate)(visit)
    }

    fn labelled<F>(label: impl Into<SmolStr>, predicate: F) -> Self
    where
        F: Fn(&Visit<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            label: label.into(),
        }
    }
}

impl Default for DeclarationFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for DeclarationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DeclarationFilter").field(&self.label).finish()
    }
}
