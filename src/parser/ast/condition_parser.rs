use crate::parser::{ast::{ExpressionParser, NodeId, NodeKind, Span}, ParseError, QueryParser};

/// `WHERE expr`, `HAVING expr` and the `ON expr` of a join.
pub struct ConditionParser;

impl ConditionParser {
    pub fn is_condition_start(parser: &QueryParser) -> bool {
        parser.comparers.r#where.compare(parser) || parser.comparers.having.compare(parser)
    }

    /// `ON` of a join, not of `ON DUPLICATE KEY UPDATE`.
    pub fn is_join_condition_start(parser: &QueryParser) -> bool {
        parser.comparers.on.compare(parser) && !parser.comparers.on_duplicate.compare(parser)
    }

    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        let kind = if ConditionParser::is_condition_start(parser) {
            NodeKind::Condition { keyword: pivot }
        } else if ConditionParser::is_join_condition_start(parser) {
            NodeKind::JoinCondition { keyword: pivot }
        } else {
            return ParseError::new("Invalid condition", pivot, parser).err();
        };
        parser.next();

        let node = parser.tree.push(kind, Span::single(pivot), parent);
        ExpressionParser::parse(parser, Some(node))?;
        parser.tree.set_stop(node, parser.previous);

        Ok(node)
    }
}
