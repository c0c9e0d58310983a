use crate::parser::{ast::{Boundary, NodeId, NodeKind, OperandParser, Span, StatementParser}, ParseError, QueryParser, TokenKind};

pub struct ArgsParser;

impl ArgsParser {
    pub fn is_args_start(parser: &QueryParser) -> bool {
        parser.is_current(TokenKind::LeftParen)
    }

    pub fn is_args_end(parser: &QueryParser) -> bool {
        parser.is_current(TokenKind::RightParen)
    }

    /// Parse `( item, item, ... )` into a node of `kind` whose children are
    /// the item operands.
    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>, kind: NodeKind) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if !ArgsParser::is_args_start(parser) {
            return ParseError::new("Invalid args value", pivot, parser).err();
        }
        parser.next();

        let list = parser.tree.push(kind, Span::single(pivot), parent);
        let mut can_consume = true;

        while !parser.eof() && !ArgsParser::is_args_end(parser) {
            if parser.is_current(TokenKind::Comma) {
                if can_consume {
                    return ParseError::new("Invalid args value", pivot, parser).err();
                }
                can_consume = true;
                parser.next();
            } else {
                if !can_consume {
                    return ParseError::new("Invalid args value", pivot, parser).err();
                }
                OperandParser::parse(parser, Some(list), Boundary::ListItem)?;
                can_consume = false;
            }
        }

        if parser.eof() || (can_consume && !parser.tree.children(list).is_empty()) {
            return ParseError::new("Invalid args value", pivot, parser).err();
        }

        if let Some(close) = parser.next() {
            parser.tree.set_stop(list, close);
        }
        Ok(list)
    }

    /// Right side of `IN`: either a value list or a sub-statement.
    pub fn parse_in(parser: &mut QueryParser, node: NodeId) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        if parser.is_subquery_start() {
            parser.next();
            let statement = StatementParser::parse(parser, Some(node), true)?;
            parser.expect(TokenKind::RightParen, "Unbalanced parenthesis")?;
            return Ok(statement);
        }

        let list = ArgsParser::parse(parser, Some(node), NodeKind::InList)?;
        if parser.tree.children(list).is_empty() {
            return ParseError::new("Empty IN list", pivot, parser).err();
        }
        Ok(list)
    }
}
