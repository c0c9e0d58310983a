use crate::parser::{ParseError, Token, TokenKind};

const MULTI_CHAR_OPERATORS: [&str; 13] = [
    "<=>", "->>", "<=", ">=", "<>", "!=", "==", "&&", "||", ":=", "<<", ">>", "->",
];

const OPERATOR_CHARS: &str = "=<>!+-*/%&|^~:";

#[derive(Debug, Default)]
pub struct SqlLexer {
    pub position: usize,
    pub length: usize,
    pub text_v: Vec<char>,
}

impl SqlLexer {
    pub fn new(text: &str) -> Self {
        let text_v: Vec<char> = text.chars().collect();
        Self {
            position: 0,
            length: text_v.len(),
            text_v,
        }
    }

    pub fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
        let mut lexer = Self::new(text);
        let mut tokens = vec![];
        while !lexer.eof() {
            tokens.push(lexer.next_token()?);
        }
        Ok(tokens)
    }

    pub fn eof(&self) -> bool {
        self.position >= self.length
    }

    pub fn current(&self) -> char {
        self.peek(0)
    }

    pub fn peek(&self, ahead: usize) -> char {
        self.text_v.get(self.position + ahead).copied().unwrap_or('\0')
    }

    pub fn next(&mut self) {
        if !self.eof() {
            self.position += 1;
        }
    }

    pub fn jump(&mut self, ahead: usize) {
        self.position = (self.position + ahead).min(self.length);
    }

    pub fn text_from_range(&self, start: usize, end: usize) -> String {
        let end = end.min(self.length);
        let start = start.min(end);
        self.text_v[start..end].iter().collect()
    }

    pub fn text_from_pivot(&self, pivot: usize) -> String {
        self.text_from_range(pivot, self.position)
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let pivot = self.position;
        let current = self.current();

        let kind = match current {
            c if c.is_whitespace() => {
                while self.current().is_whitespace() {
                    self.next();
                }
                TokenKind::Whitespace
            },
            '-' if self.peek(1) == '-' => {
                while !self.eof() && self.current() != '\n' {
                    self.next();
                }
                TokenKind::Comment
            },
            '/' if self.peek(1) == '*' => {
                self.read_block_comment(pivot)?;
                TokenKind::Comment
            },
            '\'' | '"' => {
                self.read_quoted(current, pivot)?;
                TokenKind::String
            },
            '`' => {
                self.read_quoted(current, pivot)?;
                TokenKind::QuotedIdentifier
            },
            '#' | '?' if self.peek(1) == '{' => {
                self.read_placeholder(pivot)?;
                TokenKind::Placeholder
            },
            '?' => {
                self.next();
                TokenKind::Question
            },
            ',' => { self.next(); TokenKind::Comma },
            '(' => { self.next(); TokenKind::LeftParen },
            ')' => { self.next(); TokenKind::RightParen },
            ';' => { self.next(); TokenKind::Semicolon },
            c if c.is_ascii_digit() || (c == '.' && self.peek(1).is_ascii_digit()) => {
                self.read_number();
                TokenKind::Number
            },
            '.' => { self.next(); TokenKind::Dot },
            c if Self::is_word_start(c) => {
                while Self::is_word_part(self.current()) {
                    self.next();
                }
                TokenKind::Word
            },
            c if OPERATOR_CHARS.contains(c) => {
                self.read_operator();
                TokenKind::Operator
            },
            _ => {
                self.next();
                TokenKind::Other
            },
        };

        Ok(Token::new(kind, self.text_from_pivot(pivot), pivot))
    }

    fn is_word_start(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_' || ch == '@'
    }

    fn is_word_part(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '$' || ch == '@'
    }

    fn read_block_comment(&mut self, pivot: usize) -> Result<(), ParseError> {
        self.jump(2);
        while !self.eof() {
            if self.current() == '*' && self.peek(1) == '/' {
                self.jump(2);
                return Ok(());
            }
            self.next();
        }
        ParseError::lexical("Unterminated comment", pivot, self).err()
    }

    fn read_quoted(&mut self, quote: char, pivot: usize) -> Result<(), ParseError> {
        self.next();
        while !self.eof() {
            let current = self.current();
            if current == '\\' && quote != '`' {
                self.jump(2);
            } else if current == quote {
                if self.peek(1) == quote {
                    self.jump(2);
                } else {
                    self.next();
                    return Ok(());
                }
            } else {
                self.next();
            }
        }
        ParseError::lexical("Unterminated quoted text", pivot, self).err()
    }

    fn read_placeholder(&mut self, pivot: usize) -> Result<(), ParseError> {
        self.jump(2);
        while !self.eof() {
            if self.current() == '}' {
                self.next();
                return Ok(());
            }
            if self.current() == '{' || self.current() == '\n' {
                break;
            }
            self.next();
        }
        ParseError::lexical("Unterminated placeholder", pivot, self).err()
    }

    fn read_number(&mut self) {
        while self.current().is_ascii_digit() || self.current() == '.' {
            self.next();
        }
        let exponent = matches!(self.current(), 'e' | 'E')
            && (self.peek(1).is_ascii_digit()
                || (matches!(self.peek(1), '+' | '-') && self.peek(2).is_ascii_digit()));
        if exponent {
            self.jump(2);
            while self.current().is_ascii_digit() {
                self.next();
            }
        }
        // hex literals and identifiers that start with digits
        while Self::is_word_part(self.current()) {
            self.next();
        }
    }

    fn read_operator(&mut self) {
        for operator in MULTI_CHAR_OPERATORS {
            let width = operator.chars().count();
            if self.text_from_range(self.position, self.position + width) == operator {
                self.jump(width);
                return;
            }
        }
        self.next();
    }
}
