use crate::{parser::{ast::{NodeId, NodeKind, Placeholder, Span}, ParseError, QueryParser, TokenKind}, property::PropertyPath};

pub struct ParamParser;

impl ParamParser {
    pub fn is_param_start(parser: &QueryParser) -> bool {
        parser.is_current(TokenKind::Placeholder)
    }

    pub fn parse(parser: &mut QueryParser, parent: Option<NodeId>) -> Result<NodeId, ParseError> {
        parser.next_non_whitespace();
        let pivot = parser.position;

        let token = match parser.current() {
            Some(token) if token.kind == TokenKind::Placeholder => token,
            _ => return ParseError::new("Invalid placeholder", pivot, parser).err(),
        };

        let required = token.text.starts_with('#');
        let inner = token.text.get(2..).and_then(|t| t.strip_suffix('}')).unwrap_or_default();

        let path = match PropertyPath::parse(inner) {
            Ok(path) => path,
            Err(err) => return ParseError::new(&format!("Invalid placeholder: {err}"), pivot, parser).err(),
        };

        parser.next();
        Ok(parser.tree.push(NodeKind::Placeholder(Placeholder { required, path }), Span::single(pivot), parent))
    }
}
