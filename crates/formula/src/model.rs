//! Formula AST
//!
//! A parsed formula is an owned tree: every node is exclusively owned by its
//! parent and the whole tree lives as long as the parse result.

use serde::{Deserialize, Serialize};

/// A node in the formula tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// A literal run of glyph text
    Identifier { text: String },
    /// A named construct holding exactly its registered number of arguments
    Function { name: String, args: Vec<Node> },
    /// A horizontal sequence of expressions; never empty
    Compound { children: Vec<Node> },
    /// No content; lays out as a single blank glyph
    Empty,
}

impl Node {
    /// Create an identifier
    pub fn identifier(text: impl Into<String>) -> Self {
        Node::Identifier { text: text.into() }
    }

    /// Create a function application
    pub fn function(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Function {
            name: name.into(),
            args,
        }
    }

    /// Create a compound, normalizing zero children to a single `Empty`
    pub fn compound(children: Vec<Node>) -> Self {
        if children.is_empty() {
            Node::Compound {
                children: vec![Node::Empty],
            }
        } else {
            Node::Compound { children }
        }
    }

    /// Create a superscript application `base^exponent`
    pub fn superscript(base: Node, exponent: Node) -> Self {
        Node::function(crate::symbols::SUPERSCRIPT, vec![base, exponent])
    }

    /// Create a subscript application `base_sub`
    pub fn subscript(base: Node, sub: Node) -> Self {
        Node::function(crate::symbols::SUBSCRIPT, vec![base, sub])
    }

    /// Child nodes in order
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Function { args, .. } => args,
            Node::Compound { children } => children,
            Node::Identifier { .. } | Node::Empty => &[],
        }
    }

    /// Total number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Node::node_count).sum::<usize>()
    }

    /// Height of this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Node::depth).max().unwrap_or(0)
    }

    /// Visit every node depth-first, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}
