use std::fmt;

use crate::property::PropertyPath;

pub type NodeId = usize;

/// Inclusive range of token indices `[start, stop]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub stop: usize,
}

impl Span {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    pub fn single(index: usize) -> Self {
        Self { start: index, stop: index }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.stop
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.stop
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.start, self.stop)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Xor,
}

/// Surface syntax of a LIMIT clause. The children of the node are stored in
/// source order, so the role of each child depends on the syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitSyntax {
    /// `LIMIT limit`
    LimitOnly,
    /// `LIMIT offset, limit`
    OffsetComma,
    /// `LIMIT limit OFFSET offset`
    OffsetKeyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    Comparison,
    Like,
    Regexp,
    SoundsLike,
    /// `IS [NOT] NULL|TRUE|FALSE|UNKNOWN`
    IsTest,
    /// an operand used as a condition on its own (`EXISTS (...)`, `flag`)
    Atom,
}

/// A `#{path}` (required) or `?{path}` (optional) marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    pub required: bool,
    pub path: PropertyPath,
}

impl Placeholder {
    pub fn name(&self) -> &str {
        self.path.as_str()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Statement(StatementKind),
    /// uninterpreted tokens; only carries placeholders and sub-statements
    Segment,
    Placeholder(Placeholder),
    /// `WHERE expr` or `HAVING expr`
    Condition { keyword: usize },
    /// `ON expr` of a join; the keyword stays, so the expression may not vanish
    JoinCondition { keyword: usize },
    /// `left op right`
    Logical { op: LogicalOp, operator: usize },
    Not,
    Paren,
    Predicate(PredicateKind),
    /// children: subject, lower, upper
    Between,
    /// children: subject, then an `InList` or a sub-statement
    In,
    InList,
    Operand,
    Limit(LimitSyntax),
    SetClause,
    /// children: target, value
    Assignment,
    Values,
    Row,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}
