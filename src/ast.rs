//! Expression AST.
//!
//! One parsed expression is an [`Ast`]: an arena that owns every node. A
//! parent refers to its children by [`NodeId`]; each node also records its
//! parent's id for navigation. Ids are only meaningful for the `Ast` that
//! issued them.

use std::fmt;

use crate::location::Location;

/// Index of a node inside its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A node with its source location and parent link.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub loc: Location,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(Literal),
    Unary {
        op: UnaryOp,
        operand: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    /// Identifier reference.
    Name(String),
    /// `name(args...)`.
    Call {
        name: String,
        args: Vec<NodeId>,
    },
    /// `name[index]`.
    Index {
        name: String,
        index: NodeId,
    },
}

impl NodeKind {
    /// Operand ids in source order; empty for leaves.
    #[must_use]
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Self::Literal(_) | Self::Name(_) => Vec::new(),
            Self::Unary { operand, .. } => vec![*operand],
            Self::Binary { left, right, .. } => vec![*left, *right],
            Self::Call { args, .. } => args.clone(),
            Self::Index { index, .. } => vec![*index],
        }
    }
}

/// Literal values, keeping the text they were parsed from.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `original` excludes any radix prefix.
    Int {
        original: String,
        radix: u32,
        value: i64,
    },
    Real {
        original: String,
        value: f64,
    },
    Boolean {
        original: String,
        value: bool,
    },
    /// `original` is the raw text between the quotes; `value` has escapes
    /// resolved.
    String {
        original: String,
        value: String,
    },
    /// Four-character code such as `'hfoo'`. `original` is the lexeme with
    /// its quotes, `code` the text between them.
    QuotedInt {
        original: String,
        code: String,
    },
    Null,
}

impl Literal {
    /// Integer value of a quoted int: its characters folded big-endian,
    /// one byte each. `None` for other literals or codes longer than four
    /// characters.
    #[must_use]
    pub fn quoted_int_value(&self) -> Option<u32> {
        match self {
            Self::QuotedInt { code, .. } if code.len() <= 4 => Some(
                code.bytes()
                    .fold(0_u32, |acc, b| (acc << 8) | u32::from(b)),
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
}

impl UnaryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Minus => "-",
            Self::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Or => "or",
            Self::And => "and",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    /// Binding power; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Gt | Self::Ge | Self::Lt | Self::Le | Self::Eq | Self::Ne => 3,
            Self::Add | Self::Sub => 4,
            Self::Mul | Self::Div => 5,
        }
    }

    #[must_use]
    pub const fn is_relational(self) -> bool {
        self.precedence() == 3
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arena holding one expression tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    /// # Panics
    ///
    /// Panics if `id` came from a different `Ast`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Direct children in source order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// All node ids, root first, each parent before its children.
    #[must_use]
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Incrementally builds an [`Ast`]. Children must be added before their
/// parent; adding the parent links them.
#[derive(Debug, Default)]
pub(crate) struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub(crate) fn push(&mut self, kind: NodeKind, loc: Location) -> NodeId {
        let id = NodeId(self.nodes.len());
        for child in kind.children() {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            loc,
            parent: None,
        });
        id
    }

    pub(crate) fn finish(self, root: NodeId) -> Ast {
        Ast {
            nodes: self.nodes,
            root,
        }
    }
}
