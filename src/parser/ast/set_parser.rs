use crate::parser::{ast::{Boundary, NodeId, NodeKind, OperandParser, Span}, ParseError, QueryParser, TokenKind};

/// `SET col = value, col = value, ...` of an UPDATE (or MySQL `INSERT ... SET`).
pub struct SetParser;

impl SetParser {
    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if !parser.comparers.set.compare(parser) {
            return ParseError::new("Invalid set clause", pivot, parser).err();
        }
        parser.next();

        let node = parser.tree.push(NodeKind::SetClause, Span::single(pivot), parent);
        loop {
            Self::parse_assignment(parser, node)?;
            if !parser.is_current(TokenKind::Comma) {
                break;
            }
            parser.next();
        }

        parser.tree.set_stop(node, parser.previous);
        Ok(node)
    }

    fn parse_assignment(parser: &mut QueryParser, node: NodeId) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;
        let assignment = parser.tree.push(NodeKind::Assignment, Span::single(pivot), Some(node));

        OperandParser::parse(parser, Some(assignment), Boundary::AssignmentTarget)?;
        if !parser.current().is_some_and(|t| t.is_operator("=")) {
            return ParseError::new("Invalid assignment", pivot, parser).err();
        }
        parser.next();
        OperandParser::parse(parser, Some(assignment), Boundary::AssignmentValue)?;

        parser.tree.set_stop(assignment, parser.previous);
        Ok(assignment)
    }
}
