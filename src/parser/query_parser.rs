use crate::parser::{ast::{StatementParser, SyntaxTree}, ParseError, QueryComparers, SqlLexer, Token, TokenKind};

/// Cursor over the token sequence of one template. The parser never looks at
/// whitespace or comments: every navigation method works on significant
/// tokens, while token indices stay those of the full sequence so that spans
/// can be rewritten losslessly later.
#[derive(Debug)]
pub struct QueryParser<'a> {
    pub position: usize,
    pub length: usize,
    pub tokens: &'a [Token],
    /// index of the last significant token consumed
    pub previous: usize,
    pub comparers: QueryComparers,
    pub tree: SyntaxTree,
}

impl<'a> QueryParser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            position: 0,
            length: tokens.len(),
            tokens,
            previous: 0,
            comparers: QueryComparers::new(),
            tree: SyntaxTree::default(),
        }
    }

    /// Tokenize and parse a whole template.
    pub fn parse_template(text: &str) -> Result<(Vec<Token>, SyntaxTree), ParseError> {
        let tokens = SqlLexer::tokenize(text)?;
        let tree = Self::parse_tokens(&tokens)?;
        Ok((tokens, tree))
    }

    pub fn parse_tokens(tokens: &[Token]) -> Result<SyntaxTree, ParseError> {
        let mut parser = QueryParser::new(tokens);
        if parser.eof() {
            return ParseError::new("Empty statement", 0, &parser).err();
        }

        let root = StatementParser::parse(&mut parser, None, false)?;
        parser.next_non_whitespace();
        if !parser.eof() {
            return ParseError::new("Unexpected token", parser.position, &parser).err();
        }

        parser.tree.set_root(root);
        Ok(parser.tree)
    }

    pub fn eof(&self) -> bool {
        self.significant_from(self.position).is_none()
    }

    pub fn next_non_whitespace(&mut self) {
        while self.position < self.length && self.tokens[self.position].is_hidden() {
            self.position += 1;
        }
    }

    pub fn significant_from(&self, index: usize) -> Option<usize> {
        (index..self.length).find(|&i| !self.tokens[i].is_hidden())
    }

    /// Index of the `ahead`-th significant token from the cursor.
    pub fn peek_index(&self, ahead: usize) -> Option<usize> {
        let mut index = self.significant_from(self.position)?;
        for _ in 0..ahead {
            index = self.significant_from(index + 1)?;
        }
        Some(index)
    }

    pub fn peek(&self, ahead: usize) -> Option<&'a Token> {
        let tokens = self.tokens;
        self.peek_index(ahead).map(|i| &tokens[i])
    }

    pub fn current(&self) -> Option<&'a Token> {
        self.peek(0)
    }

    pub fn is_current(&self, kind: TokenKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    /// Consume the current significant token and return its index.
    pub fn next(&mut self) -> Option<usize> {
        let index = self.significant_from(self.position)?;
        self.position = index + 1;
        self.previous = index;
        Some(index)
    }

    /// Consume `ahead` significant tokens, returning the index of the last one.
    pub fn jump(&mut self, ahead: usize) -> Option<usize> {
        let mut last = None;
        for _ in 0..ahead {
            last = Some(self.next()?);
        }
        last
    }

    pub fn expect(&mut self, kind: TokenKind, message: &str) -> Result<usize, ParseError> {
        self.next_non_whitespace();
        if self.is_current(kind) {
            if let Some(index) = self.next() {
                return Ok(index);
            }
        }
        ParseError::new(message, self.position, self).err()
    }

    /// `(` directly followed by `SELECT` or `WITH`.
    pub fn is_subquery_start(&self) -> bool {
        self.is_current(TokenKind::LeftParen)
            && (self.comparers.select.compare_from(self, 1) || self.comparers.with.compare_from(self, 1))
    }

    pub fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for index in open..self.length {
            match self.tokens[index].kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(index);
                    }
                },
                _ => {},
            }
        }
        None
    }
}
