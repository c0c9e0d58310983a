use crate::parser::{ast::{ArgsParser, NodeId, NodeKind, Span}, ParseError, QueryParser, TokenKind};

/// `VALUES (...), (...)` of an INSERT; every parenthesized list is a `Row`.
pub struct ValuesParser;

impl ValuesParser {
    pub fn is_values_start(parser: &QueryParser) -> bool {
        parser.comparers.values.compare(parser) || parser.comparers.value.compare(parser)
    }

    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if !ValuesParser::is_values_start(parser) {
            return ParseError::new("Invalid values", pivot, parser).err();
        }
        parser.next();

        let node = parser.tree.push(NodeKind::Values, Span::single(pivot), parent);
        loop {
            ArgsParser::parse(parser, Some(node), NodeKind::Row)?;
            if !parser.is_current(TokenKind::Comma) {
                break;
            }
            parser.next();
        }

        parser.tree.set_stop(node, parser.previous);
        Ok(node)
    }
}
