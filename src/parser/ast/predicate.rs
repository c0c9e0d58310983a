use crate::parser::{ast::{ArgsParser, Boundary, NodeId, NodeKind, OperandParser, PredicateKind}, ParseError, QueryParser, TokenKind};

pub struct PredicateParser;

impl PredicateParser {
    /// Parse `left [NOT] <operator> ...` and return the predicate node. The
    /// left operand is parsed first, then wrapped once the operator is known.
    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        let left = OperandParser::parse(parser, parent, Boundary::Predicate)?;
        let pivot = parser.position;

        let negated = parser.comparers.is_negated_predicate(parser);
        if negated {
            parser.next();
        }

        let node = if !negated && parser.current().is_some_and(|t| t.is_comparison()) {
            parser.next();
            let node = parser.tree.wrap(left, NodeKind::Predicate(PredicateKind::Comparison));
            OperandParser::parse(parser, Some(node), Boundary::Predicate)?;
            node
        } else if !negated && parser.comparers.is.compare(parser) {
            parser.next();
            if parser.comparers.not.compare(parser) {
                parser.next();
            }
            if !parser.is_current(TokenKind::Word) {
                return ParseError::new("Invalid IS predicate", pivot, parser).err();
            }
            parser.next();
            parser.tree.wrap(left, NodeKind::Predicate(PredicateKind::IsTest))
        } else if parser.comparers.between.compare(parser) {
            parser.next();
            let node = parser.tree.wrap(left, NodeKind::Between);
            OperandParser::parse(parser, Some(node), Boundary::Predicate)?;
            if !parser.comparers.and.compare(parser) {
                return ParseError::new("Invalid BETWEEN predicate", pivot, parser).err();
            }
            parser.next();
            OperandParser::parse(parser, Some(node), Boundary::Predicate)?;
            node
        } else if parser.comparers.r#in.compare(parser) {
            parser.next();
            let node = parser.tree.wrap(left, NodeKind::In);
            ArgsParser::parse_in(parser, node)?;
            node
        } else if parser.comparers.like.compare(parser) {
            parser.next();
            Self::parse_pattern(parser, left, PredicateKind::Like)?
        } else if parser.comparers.regexp.compare(parser) || parser.comparers.rlike.compare(parser) {
            parser.next();
            Self::parse_pattern(parser, left, PredicateKind::Regexp)?
        } else if !negated && parser.comparers.sounds_like.compare(parser) {
            parser.jump(parser.comparers.sounds_like.length);
            let node = parser.tree.wrap(left, NodeKind::Predicate(PredicateKind::SoundsLike));
            OperandParser::parse(parser, Some(node), Boundary::Predicate)?;
            node
        } else if negated {
            return ParseError::new("Invalid predicate", pivot, parser).err();
        } else {
            parser.tree.wrap(left, NodeKind::Predicate(PredicateKind::Atom))
        };

        parser.tree.set_stop(node, parser.previous);
        Ok(node)
    }

    fn parse_pattern(parser: &mut QueryParser, left: NodeId, kind: PredicateKind) -> Result<NodeId, ParseError> {
        let node = parser.tree.wrap(left, NodeKind::Predicate(kind));
        OperandParser::parse(parser, Some(node), Boundary::Predicate)?;

        if parser.comparers.escape.compare(parser) {
            parser.next();
            OperandParser::parse(parser, Some(node), Boundary::Predicate)?;
        }
        Ok(node)
    }
}
