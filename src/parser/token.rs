use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Word,
    QuotedIdentifier,
    String,
    Number,
    /// `#{path}` or `?{path}`
    Placeholder,
    /// A bare `?` positional marker.
    Question,
    Comma,
    LeftParen,
    RightParen,
    Dot,
    Semicolon,
    Operator,
    Other,
}

/// One lexical unit of a template, carrying its exact source text so that
/// concatenating every token reproduces the template verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// char offset of the first character in the source text
    pub start: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize) -> Self {
        Self { kind, text: text.into(), start }
    }

    /// Whitespace and comments never take part in parsing decisions.
    pub fn is_hidden(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == operator
    }

    pub fn is_comparison(&self) -> bool {
        self.kind == TokenKind::Operator
            && matches!(self.text.as_str(), "=" | "==" | "<=>" | "<>" | "!=" | "<" | "<=" | ">" | ">=")
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn end(&self) -> usize {
        self.start + self.char_len()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}@{})", self.kind, self.text, self.start)
    }
}
