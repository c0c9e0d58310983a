use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::property::PathError;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A navigation path into the parameter object: `user.name`, `ids[0]`,
/// `filters['min-age']`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    text: String,
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let text = text.trim();
        let syntax = |message: &str| PathError::Syntax { path: text.to_string(), message: message.to_string() };

        if text.is_empty() {
            return Err(syntax("empty path"));
        }

        let mut segments = vec![];
        let mut rest = text;
        let mut expect_key = true;

        while !rest.is_empty() {
            if let Some(inner) = rest.strip_prefix('[') {
                let (segment, after) = Self::parse_bracket(inner).ok_or_else(|| syntax("malformed brackets"))?;
                segments.push(segment);
                rest = after;
                expect_key = false;
                continue;
            }

            if !expect_key {
                rest = rest.strip_prefix('.').ok_or_else(|| syntax("expected '.' or '['"))?;
            }

            let key = IDENTIFIER
                .find(rest)
                .map(|m| m.as_str())
                .ok_or_else(|| syntax("expected a property name"))?;
            segments.push(PathSegment::Key(key.to_string()));
            rest = &rest[key.len()..];
            expect_key = false;
        }

        Ok(Self { text: text.to_string(), segments })
    }

    /// Content of `[...]`, returning the segment and what follows `]`.
    fn parse_bracket(inner: &str) -> Option<(PathSegment, &str)> {
        let quote = inner.chars().next()?;
        if quote == '\'' || quote == '"' {
            let body = &inner[1..];
            let close = body.find(quote)?;
            let after = body[close + 1..].strip_prefix(']')?;
            return Some((PathSegment::Key(body[..close].to_string()), after));
        }

        let close = inner.find(']')?;
        let index = inner[..close].trim().parse::<usize>().ok()?;
        Some((PathSegment::Index(index), &inner[close + 1..]))
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Path text up to and including segment `index`, used in error messages.
    pub fn prefix(&self, index: usize) -> String {
        let mut prefix = String::new();
        for segment in self.segments.iter().take(index + 1) {
            if let PathSegment::Key(key) = segment {
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(key);
            } else {
                prefix.push_str(&segment.to_string());
            }
        }
        prefix
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for PropertyPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
