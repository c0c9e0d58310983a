use std::fmt::Display;

use crate::parser::{QueryParser, SqlLexer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl ParseError {
    /// Error raised by the parser; `pivot` is the token index where the
    /// offending construct starts, the error runs up to the current token.
    pub fn new(message: &str, pivot: usize, parser: &QueryParser) -> Self {
        let tokens = parser.tokens;
        let last = parser.position.min(tokens.len().saturating_sub(1));
        let pivot = pivot.min(last);

        let text = tokens
            .get(pivot..=last)
            .map(|slice| slice.iter().map(|t| t.text.as_str()).collect::<String>())
            .unwrap_or_default();
        let start = tokens.get(pivot).map(|t| t.start).unwrap_or_default();
        let end = match tokens.get(parser.position) {
            Some(token) => token.start,
            None => tokens.last().map(|t| t.end()).unwrap_or_default(),
        };

        Self {
            message: message.to_string(),
            text: text.trim().to_string(),
            start,
            end,
        }
    }

    /// Error raised while splitting the template text into tokens.
    pub fn lexical(message: &str, pivot: usize, lexer: &SqlLexer) -> Self {
        Self {
            message: message.to_string(),
            text: lexer.text_from_range(pivot, lexer.position + 1),
            start: pivot,
            end: lexer.position,
        }
    }

    pub fn err<T>(self) -> Result<T, ParseError> {
        Err(self)
    }
}

impl Display for ParseError  {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "ParseError: {}\n  at [{}:{}] -> '{}'",
                self.message,
                self.start,
                self.end,
                self.text
            )
    }
}

impl std::error::Error for ParseError {}
