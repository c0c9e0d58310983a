use crate::parser::{ast::{LimitSyntax, NodeId, NodeKind, ParamParser, Span}, ParseError, QueryParser, TokenKind};

/// `LIMIT n`, `LIMIT offset, n` and `LIMIT n OFFSET offset`. Each value is
/// kept as an `Operand` child, in source order.
pub struct LimitAndOffsetParser;

impl LimitAndOffsetParser {
    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if !parser.comparers.limit.compare(parser) {
            return ParseError::new("Invalid limit", pivot, parser).err();
        }
        parser.next();

        let node = parser.tree.push(NodeKind::Limit(LimitSyntax::LimitOnly), Span::single(pivot), parent);
        Self::parse_value(parser, node)?;

        if parser.is_current(TokenKind::Comma) {
            parser.next();
            Self::parse_value(parser, node)?;
            parser.tree.set_kind(node, NodeKind::Limit(LimitSyntax::OffsetComma));
        } else if parser.comparers.offset.compare(parser) {
            parser.next();
            Self::parse_value(parser, node)?;
            parser.tree.set_kind(node, NodeKind::Limit(LimitSyntax::OffsetKeyword));
        }

        parser.tree.set_stop(node, parser.previous);
        Ok(node)
    }

    fn parse_value(parser: &mut QueryParser, node: NodeId) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;
        let operand = parser.tree.push(NodeKind::Operand, Span::single(pivot), Some(node));

        if ParamParser::is_param_start(parser) {
            ParamParser::parse(parser, Some(operand))?;
            return Ok(operand);
        }

        match parser.current().map(|t| t.kind) {
            Some(TokenKind::Number | TokenKind::Question | TokenKind::Word) if !parser.comparers.offset.compare(parser) => {
                parser.next();
                Ok(operand)
            },
            _ => ParseError::new("Invalid limit", pivot, parser).err(),
        }
    }
}
