use crate::parser::{ast::{LogicalOp, NodeId, NodeKind, PredicateParser, Span}, ParseError, QueryParser, TokenKind};

/// Boolean expression of a WHERE or HAVING clause.
///
/// Precedence, loosest first: `OR`, `XOR`, `AND`, `NOT`. Every binary
/// operator is left-associative, so `a AND b AND c` is `(a AND b) AND c`.
pub struct ExpressionParser;

impl ExpressionParser {
    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        Self::parse_or(parser, parent)
    }

    fn parse_or(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        let mut left = Self::parse_xor(parser, parent)?;
        while parser.comparers.or.compare(parser) || parser.current().is_some_and(|t| t.is_operator("||")) {
            left = Self::combine(parser, left, LogicalOp::Or)?;
        }
        Ok(left)
    }

    fn parse_xor(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        let mut left = Self::parse_and(parser, parent)?;
        while parser.comparers.xor.compare(parser) {
            left = Self::combine(parser, left, LogicalOp::Xor)?;
        }
        Ok(left)
    }

    fn parse_and(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        let mut left = Self::parse_unary(parser, parent)?;
        while parser.comparers.and.compare(parser) || parser.current().is_some_and(|t| t.is_operator("&&")) {
            left = Self::combine(parser, left, LogicalOp::And)?;
        }
        Ok(left)
    }

    fn combine(parser: &mut QueryParser, left: NodeId, op: LogicalOp) -> Result<NodeId, ParseError> {
        let pivot = parser.position;
        let Some(operator) = parser.next() else {
            return ParseError::new("Invalid condition", pivot, parser).err();
        };

        let node = parser.tree.wrap(left, NodeKind::Logical { op, operator });
        let right = match op {
            LogicalOp::Or => Self::parse_xor(parser, Some(node))?,
            LogicalOp::Xor => Self::parse_and(parser, Some(node))?,
            LogicalOp::And => Self::parse_unary(parser, Some(node))?,
        };

        let stop = parser.tree.span(right).stop;
        parser.tree.set_stop(node, stop);
        Ok(node)
    }

    fn parse_unary(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        let negation = parser.comparers.not.compare(parser) || parser.current().is_some_and(|t| t.is_operator("!"));
        if !negation {
            return Self::parse_primary(parser, parent);
        }

        let pivot = parser.position;
        let Some(keyword) = parser.next() else {
            return ParseError::new("Invalid condition", pivot, parser).err();
        };
        let node = parser.tree.push(NodeKind::Not, Span::single(keyword), parent);
        let inner = Self::parse_unary(parser, Some(node))?;

        let stop = parser.tree.span(inner).stop;
        parser.tree.set_stop(node, stop);
        Ok(node)
    }

    fn parse_primary(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if parser.eof() {
            return ParseError::new("Invalid condition", pivot, parser).err();
        }

        if !Self::is_group_start(parser, pivot)? {
            return PredicateParser::parse(parser, parent);
        }

        parser.next();
        let node = parser.tree.push(NodeKind::Paren, Span::single(pivot), parent);
        Self::parse_or(parser, Some(node))?;
        let close = parser.expect(TokenKind::RightParen, "Unbalanced parenthesis")?;
        parser.tree.set_stop(node, close);
        Ok(node)
    }

    /// A `(` opens a nested boolean group unless it starts a sub-statement or
    /// the group is followed by something that continues an operand, as in
    /// `(a + b) > 3`.
    fn is_group_start(parser: &QueryParser, pivot: usize) -> Result<bool, ParseError> {
        if !parser.is_current(TokenKind::LeftParen) || parser.is_subquery_start() {
            return Ok(false);
        }

        let Some(close) = parser.matching_paren(pivot) else {
            return ParseError::new("Unbalanced parenthesis", pivot, parser).err();
        };

        let follows = parser.significant_from(close + 1).map(|i| &parser.tokens[i]);
        Ok(!follows.is_some_and(|t| parser.comparers.continues_operand(t)))
    }
}
