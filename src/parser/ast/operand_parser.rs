use crate::parser::{ast::{NodeId, NodeKind, ParamParser, Span, StatementParser}, ParseError, QueryParser, TokenKind};

/// Where an operand stops, besides a closing parenthesis of the enclosing
/// group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// side of a predicate: comparison operators, predicate keywords,
    /// clause keywords, `,` and `;`
    Predicate,
    /// item of a parenthesized list
    ListItem,
    /// column on the left of `=` in a SET clause
    AssignmentTarget,
    /// value on the right of `=` in a SET clause
    AssignmentValue,
}

pub struct OperandParser;

impl OperandParser {
    fn is_boundary(parser: &QueryParser, boundary: Boundary) -> bool {
        let Some(token) = parser.current() else {
            return true;
        };

        if matches!(token.kind, TokenKind::Comma | TokenKind::Semicolon) {
            return true;
        }

        match boundary {
            Boundary::Predicate => {
                token.is_comparison()
                    || parser.comparers.is_predicate_keyword(parser)
                    || parser.comparers.is_clause_boundary(parser)
            },
            Boundary::ListItem => false,
            Boundary::AssignmentTarget => token.is_operator("="),
            Boundary::AssignmentValue => parser.comparers.is_clause_boundary(parser),
        }
    }

    /// Parse one scalar expression into an `Operand` node. Placeholders and
    /// sub-statements found inside become its children; everything else is
    /// kept as plain tokens.
    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>, boundary: Boundary) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;
        let operand = parser.tree.push(NodeKind::Operand, Span::single(pivot), parent);

        let mut depth = 0usize;
        let mut consumed = false;

        while let Some(token) = parser.current() {
            if depth == 0 && Self::is_boundary(parser, boundary) {
                break;
            }

            match token.kind {
                TokenKind::LeftParen if parser.is_subquery_start() => {
                    parser.next();
                    StatementParser::parse(parser, Some(operand), true)?;
                    parser.expect(TokenKind::RightParen, "Unbalanced parenthesis")?;
                    consumed = true;
                    continue;
                },
                TokenKind::Placeholder => {
                    ParamParser::parse(parser, Some(operand))?;
                    consumed = true;
                    continue;
                },
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                },
                _ if parser.comparers.case.compare(parser) => depth += 1,
                _ if depth > 0 && parser.comparers.end.compare(parser) => depth -= 1,
                _ => {},
            }

            parser.next();
            consumed = true;
        }

        if depth > 0 {
            return ParseError::new("Unbalanced parenthesis", pivot, parser).err();
        }
        if !consumed {
            return ParseError::new("Missing operand", pivot, parser).err();
        }

        parser.tree.set_span(operand, Span::new(pivot, parser.previous));
        Ok(operand)
    }
}
