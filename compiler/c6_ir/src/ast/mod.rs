//! Flat AST.
//!
//! Every node lives in an [`AstPool`] and is addressed by [`NodeId`]. Child
//! lists (arguments, statements, parameters) are [`NodeRange`]s into the
//! pool's list table. Optional children use [`NodeId::INVALID`].

mod dump;
mod operators;
mod pool;

use std::fmt;

use bitflags::bitflags;

use crate::{FileIndex, Span};

pub use dump::dump_tree;
pub use operators::{BinaryOp, UnaryOp};
pub use pool::{AstMark, AstPool, DebugIds};

/// Index into an [`AstPool`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Absent child (sentinel value).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this ID refers to a node.
    #[inline]
    pub const fn is_present(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Range of node ids in the pool's list table.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct NodeRange {
    pub start: u32,
    pub len: u32,
}

impl NodeRange {
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

bitflags! {
    /// Per-node flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct NodeFlags: u32 {
        /// Expression was written inside parentheses. Blocks rotation.
        const EXPR_IN_PAREN = 1 << 0;
        /// Function is implemented by a native library (`#foreign`).
        const FOREIGN = 1 << 1;
        /// Function takes `...` trailing arguments.
        const VARIADIC = 1 << 2;
    }
}

/// Numeric literal value.
///
/// Floats are stored as bits so the type stays `Eq + Hash`.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub enum Number {
    Int(u64),
    Float(u64),
}

impl Number {
    #[inline]
    pub fn float(value: f64) -> Self {
        Number::Float(value.to_bits())
    }

    /// The value as a float, converting integers.
    #[expect(
        clippy::cast_precision_loss,
        reason = "literal conversion mirrors an explicit numeric cast"
    )]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(bits) => f64::from_bits(bits),
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(bits) => write!(f, "{:?}", f64::from_bits(*bits)),
        }
    }
}

/// One AST node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub file: FileIndex,
    pub span: Span,
    pub flags: NodeFlags,
    /// Process-unique id for diagnostics. Carries no ordering meaning.
    pub debug_id: u32,
}

/// Node payloads.
///
/// Names and string literals are spans into the source text. Optional
/// children are [`NodeId::INVALID`] when absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    // Expressions
    Identifier {
        name: Span,
    },
    /// Literal contents without the surrounding quotes, escapes uncooked.
    StringLiteral {
        value: Span,
    },
    NumberLiteral {
        value: Number,
    },
    Nil,
    UnaryOp {
        op: UnaryOp,
        operand: NodeId,
    },
    BinaryOp {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    Call {
        callee: NodeId,
        args: NodeRange,
    },
    Subscript {
        container: NodeId,
        index: NodeId,
    },
    /// `operand.(ty)`
    Cast {
        operand: NodeId,
        ty: NodeId,
    },
    MemberAccess {
        container: NodeId,
        member: Span,
    },

    // Types
    NamedType {
        name: Span,
    },
    PointerType {
        pointee: NodeId,
    },

    // Declarations
    File {
        declarations: NodeRange,
    },
    /// `#load "path";`, `path` excludes the quotes.
    LoadDirective {
        path: Span,
    },
    Struct {
        name: Option<Span>,
        members: NodeRange,
    },
    /// `name :: value;` where `value` is neither a struct nor a function.
    Const {
        name: Span,
        value: NodeId,
    },
    Var {
        name: Span,
        ty: NodeId,
        initializer: NodeId,
    },
    Function {
        name: Option<Span>,
        params: NodeRange,
        returns: NodeRange,
        /// `INVALID` for foreign functions.
        body: NodeId,
        /// Library named after `#foreign`, without quotes.
        library: Option<Span>,
    },

    // Statements
    Block {
        statements: NodeRange,
    },
    VariableDefinition {
        vars: NodeRange,
    },
    If {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    While {
        condition: NodeId,
        body: NodeId,
    },
    Defer {
        statement: NodeId,
    },
    Return {
        values: NodeRange,
    },
    Break,
    Continue,
    Assignment {
        targets: NodeRange,
        values: NodeRange,
    },
    ExpressionStatement {
        expr: NodeId,
    },
}

impl NodeKind {
    /// Whether this kind is a type expression.
    pub const fn is_type(&self) -> bool {
        matches!(self, NodeKind::NamedType { .. } | NodeKind::PointerType { .. })
    }
}
