//! Backend-neutral syntax trees.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

/// What a node in a parsed tree declares.
///
/// Adapters map their own node types onto these tags; anything without a
/// direct counterpart goes into [`NodeKind::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Namespace,
    Class,
    Struct,
    Interface,
    Enum,
    Record,
    Function,
    Other(SmolStr),
}

impl NodeKind {
    /// Type declarations that own members: classes, structs, interfaces,
    /// enums and records.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Class
                | NodeKind::Struct
                | NodeKind::Interface
                | NodeKind::Enum
                | NodeKind::Record
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::Struct => "struct",
            NodeKind::Interface => "interface",
            NodeKind::Enum => "enum",
            NodeKind::Record => "record",
            NodeKind::Function => "function",
            NodeKind::Other(kind) => kind.as_str(),
        }
    }
}

/// A node of a parsed document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub name: Option<SmolStr>,
    /// Full extent of the node, from its first token to its last.
    pub range: TextRange,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, range: TextRange) -> Self {
        Self {
            kind,
            name: None,
            range,
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// The parsed form of one document: its top-level nodes in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    items: Vec<SyntaxNode>,
    len: TextSize,
}

impl SyntaxTree {
    pub fn new(items: Vec<SyntaxNode>, len: TextSize) -> Self {
        Self { items, len }
    }

    pub fn items(&self) -> &[SyntaxNode] {
        &self.items
    }

    /// Length of the source text the tree was parsed from.
    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Walks every node in pre-order, preserving source order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: vec![Frame {
                nodes: self.items.iter(),
                parent: None,
                prefix: String::new(),
                in_type: false,
            }],
        }
    }

    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }
}

/// A node together with where the walk found it.
#[derive(Clone, Debug)]
pub struct Visit<'a> {
    pub node: &'a SyntaxNode,
    /// 0 for top-level nodes.
    pub depth: usize,
    pub parent: Option<&'a SyntaxNode>,
    /// True when some ancestor is class-like.
    pub in_type: bool,
    /// Dot-joined names of the named ancestors and the node itself.
    pub qualified_name: String,
}

struct Frame<'a> {
    nodes: std::slice::Iter<'a, SyntaxNode>,
    parent: Option<&'a SyntaxNode>,
    prefix: String,
    in_type: bool,
}

/// Pre-order iterator returned by [`SyntaxTree::preorder`].
pub struct Preorder<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let frame = self.stack.last_mut()?;
            let Some(node) = frame.nodes.next() else {
                self.stack.pop();
                continue;
            };

            let parent = frame.parent;
            let in_type = frame.in_type;
            let qualified_name = match &node.name {
                Some(name) if frame.prefix.is_empty() => name.to_string(),
                Some(name) => format!("{}.{}", frame.prefix, name),
                None => frame.prefix.clone(),
            };

            if !node.children.is_empty() {
                self.stack.push(Frame {
                    nodes: node.children.iter(),
                    parent: Some(node),
                    prefix: qualified_name.clone(),
                    in_type: in_type || node.kind.is_class_like(),
                });
            }

            return Some(Visit {
                node,
                depth,
                parent,
                in_type,
                qualified_name,
            });
        }
    }
}
