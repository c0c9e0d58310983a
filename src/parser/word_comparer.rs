use crate::parser::{QueryParser, Token};

/// Matches a keyword, or a run of keywords such as `SOUNDS LIKE`, against the
/// next significant tokens of the parser. Whitespace and comments between the
/// words are ignored.
#[derive(Debug, Default, Clone)]
pub struct WordComparer {
    pub length: usize,
    pub words: Vec<String>,
}

impl WordComparer {
    pub fn new(words: &str) -> Self {
        let words: Vec<String> = words.split_whitespace().map(|w| w.to_uppercase()).collect();
        Self {
            length: words.len(),
            words,
        }
    }

    pub fn compare(&self, parser: &QueryParser) -> bool {
        self.compare_from(parser, 0)
    }

    /// Same as `compare`, but starting `ahead` significant tokens after the
    /// current one.
    pub fn compare_from(&self, parser: &QueryParser, ahead: usize) -> bool {
        self.words
            .iter()
            .enumerate()
            .all(|(position, word)| parser.peek(ahead + position).is_some_and(|t| t.is_word(word)))
    }

    /// Single-token check for callers that hold a token outside the cursor.
    pub fn compare_token(&self, token: &Token) -> bool {
        self.length == 1 && token.is_word(&self.words[0])
    }
}
