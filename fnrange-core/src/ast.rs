//! AST adapter layer for function discovery
//!
//! SWC's AST has no parent links, so the parsed program is lowered into a
//! small arena tree that keeps exactly what naming needs: a closed node-kind
//! classification, an optional name sub-node, parent/children links and byte
//! ranges into the source text.
//!
//! Global invariants enforced:
//! - Node 0 is the root and covers the whole source text
//! - Children are stored in source order
//! - The tree is immutable once built

use std::ops::Range;

/// Index of a node inside its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Half-open byte range into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        TextRange { start, end }
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Closed classification of the syntax the naming engine cares about
///
/// Anything not listed is [`NodeKind::Other`]; it still takes part in parent
/// links so that naming only ever looks at the true immediate parent.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    SourceFile,
    FunctionDeclaration { has_body: bool },
    FunctionExpression,
    ArrowFunction,
    Method { has_body: bool },
    Constructor { has_body: bool },
    GetAccessor { has_body: bool },
    SetAccessor { has_body: bool },
    /// Class declaration or class expression; the class name is the node's name
    Class,
    /// `const x = ...`; named only when the binding is a plain identifier
    VariableDeclaration,
    /// `key: value` inside an object literal
    PropertyAssignment,
    /// Class field, `key = value` inside a class body
    PropertyDeclaration,
    Parenthesized,
    /// Plain `=` assignment; compound operators are [`NodeKind::Other`]
    Assignment { target: AccessPath },
    Call { callee: AccessPath, callee_range: TextRange },
    New { callee: AccessPath, callee_range: TextRange },
    Decorator { expression: AccessPath },
    Other,
}

impl NodeKind {
    /// Whether this node introduces a callable body that gets a range
    ///
    /// Bodiless overloads, abstract members and ambient declarations are not
    /// function-like for discovery purposes.
    pub fn is_function_like(&self) -> bool {
        match self {
            NodeKind::FunctionExpression | NodeKind::ArrowFunction => true,
            NodeKind::FunctionDeclaration { has_body }
            | NodeKind::Method { has_body }
            | NodeKind::Constructor { has_body }
            | NodeKind::GetAccessor { has_body }
            | NodeKind::SetAccessor { has_body } => *has_body,
            NodeKind::SourceFile
            | NodeKind::Class
            | NodeKind::VariableDeclaration
            | NodeKind::PropertyAssignment
            | NodeKind::PropertyDeclaration
            | NodeKind::Parenthesized
            | NodeKind::Assignment { .. }
            | NodeKind::Call { .. }
            | NodeKind::New { .. }
            | NodeKind::Decorator { .. }
            | NodeKind::Other => false,
        }
    }
}

/// Name sub-node: a declaration name or a property key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyName {
    Identifier(String),
    /// `#field`; the text includes the leading `#`
    PrivateIdentifier(String),
    StringLiteral(String),
    NumericLiteral(String),
    Computed(ComputedKey),
}

/// Inner expression of a computed key `[expr]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputedKey {
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),
    Other,
}

/// Expression shape used to render callee and assignment-target paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPath {
    /// `object.property`
    Property { object: Box<AccessPath>, property: String },
    /// `object[index]`; the index is kept as source text
    Element { object: Box<AccessPath>, index: String },
    /// Call expression, kept as its full source text
    Call { text: String },
    Identifier(String),
    StringLiteral(String),
    NumericLiteral(String),
    Other,
}

#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub name: Option<PropertyName>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub range: TextRange,
}

/// Parsed file as an arena of [`SyntaxNode`]s
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Create a tree holding only a root covering `0..source_len`
    pub fn new(source_len: usize) -> Self {
        SyntaxTree {
            nodes: vec![SyntaxNode {
                kind: NodeKind::SourceFile,
                name: None,
                parent: None,
                children: Vec::new(),
                range: TextRange::new(0, source_len),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Append a node under `parent` and return its id
    pub fn push(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        name: Option<PropertyName>,
        range: TextRange,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind,
            name,
            parent: Some(parent),
            children: Vec::new(),
            range,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Order every child list by start offset
    ///
    /// The lowering visits fields in struct order, which is not always source
    /// order (a class's `extends` clause is visited after its body).
    pub(crate) fn sort_children(&mut self) {
        for index in 0..self.nodes.len() {
            let mut children = std::mem::take(&mut self.nodes[index].children);
            children.sort_by_key(|child| self.nodes[child.index()].range.start);
            self.nodes[index].children = children;
        }
    }

    /// Nodes in depth-first pre-order, using an explicit stack
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root()],
        }
    }
}

/// Pre-order iterator over a [`SyntaxTree`]
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
