use crate::{error::TemplateError, parser::{ast::Span, Token, TokenKind}};

pub const MARKER: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Keep,
    Deleted,
    /// first token of a replaced span, holding the new text
    Replaced { text: String, stop: usize },
    /// other tokens of a replaced span
    Covered { head: usize },
}

/// A pending change over an inclusive token span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Delete(Span),
    Replace(Span, String),
    /// replace with a single `?`
    Marker(Span),
}

/// Collects edits keyed by token index and renders the final text.
///
/// Deleting is idempotent so cascading removals can delete the same tokens
/// more than once. Replacing tokens that were already edited, or deleting
/// part of a replacement, is a conflict.
#[derive(Debug)]
pub struct SpanRewriter<'t> {
    tokens: &'t [Token],
    slots: Vec<Slot>,
}

impl<'t> SpanRewriter<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            slots: vec![Slot::Keep; tokens.len()],
        }
    }

    fn check_bounds(&self, span: Span) -> Result<(), TemplateError> {
        if span.start > span.stop || span.stop >= self.slots.len() {
            return Err(TemplateError::invariant(format!("span {:?} is outside the template", span)));
        }
        Ok(())
    }

    pub fn apply(&mut self, edit: Edit) -> Result<(), TemplateError> {
        match edit {
            Edit::Delete(span) => self.delete(span),
            Edit::Replace(span, text) => self.replace(span, text),
            Edit::Marker(span) => self.replace(span, MARKER),
        }
    }

    fn delete(&mut self, span: Span) -> Result<(), TemplateError> {
        self.check_bounds(span)?;

        for index in span.indices() {
            match &self.slots[index] {
                Slot::Replaced { stop, .. } if *stop > span.stop => {
                    return Err(TemplateError::invariant(format!("delete {:?} splits a replacement", span)));
                },
                Slot::Covered { head } if *head < span.start => {
                    return Err(TemplateError::invariant(format!("delete {:?} splits a replacement", span)));
                },
                _ => {},
            }
        }

        for index in span.indices() {
            self.slots[index] = Slot::Deleted;
        }
        Ok(())
    }

    fn replace(&mut self, span: Span, text: impl Into<String>) -> Result<(), TemplateError> {
        self.check_bounds(span)?;

        if let Some(index) = span.indices().find(|i| self.slots[*i] != Slot::Keep) {
            return Err(TemplateError::invariant(format!(
                "replace {:?} overlaps an earlier edit at token {}",
                span, index
            )));
        }

        self.slots[span.start] = Slot::Replaced { text: text.into(), stop: span.stop };
        for index in span.start + 1..=span.stop {
            self.slots[index] = Slot::Covered { head: span.start };
        }
        Ok(())
    }

    /// Untouched tokens are emitted verbatim. Only whitespace next to a
    /// deleted run is dropped, so removals do not leave doubled spaces or a
    /// blank before `)`, `,` and `;`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut gap = false;
        let mut index = 0;

        while index < self.tokens.len() {
            match &self.slots[index] {
                Slot::Deleted => {
                    gap = true;
                },
                Slot::Covered { .. } => {},
                Slot::Replaced { text, stop } => {
                    out.push_str(text);
                    gap = false;
                    index = *stop + 1;
                    continue;
                },
                Slot::Keep => {
                    let token = &self.tokens[index];
                    if gap && token.is_whitespace() {
                        if out.is_empty() || out.ends_with(char::is_whitespace) || out.ends_with('(') {
                            index += 1;
                            continue;
                        }
                    } else if gap && matches!(token.kind, TokenKind::RightParen | TokenKind::Comma | TokenKind::Semicolon) {
                        out.truncate(out.trim_end().len());
                    }

                    if !token.is_whitespace() {
                        gap = false;
                    }
                    out.push_str(&token.text);
                },
            }
            index += 1;
        }

        if gap {
            out.truncate(out.trim_end().len());
        }
        out
    }
}
