use serde_json::Value;

use crate::property::{PathError, PathSegment, PropertyPath};

/// Outcome of looking a path up in the parameter object. A property that is
/// present with a `null` value and a property that is absent are kept apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'v> {
    Value(&'v Value),
    Null,
    Missing,
}

impl<'v> Resolved<'v> {
    /// The non-null value, if any.
    pub fn value(&self) -> Option<&'v Value> {
        match self {
            Resolved::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        !matches!(self, Resolved::Value(_))
    }
}

pub trait PropertyEvaluator: Send + Sync {
    fn evaluate<'v>(&self, root: &'v Value, path: &PropertyPath) -> Result<Resolved<'v>, PathError>;
}

/// Evaluator over `serde_json::Value` parameter objects.
///
/// A scalar parameter resolves any single-key path to itself, so a template
/// with one placeholder can be applied to a bare value. With `strict` set an
/// absent key is an error instead of a null.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEvaluator {
    pub strict: bool,
}

impl JsonEvaluator {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }
}

impl PropertyEvaluator for JsonEvaluator {
    fn evaluate<'v>(&self, root: &'v Value, path: &PropertyPath) -> Result<Resolved<'v>, PathError> {
        let segments = path.segments();

        if !matches!(root, Value::Object(_) | Value::Array(_))
            && matches!(segments, [PathSegment::Key(_)])
        {
            return Ok(match root {
                Value::Null => Resolved::Null,
                value => Resolved::Value(value),
            });
        }

        let mut current = root;
        for (position, segment) in segments.iter().enumerate() {
            let parent_path = if position == 0 { "$".to_string() } else { path.prefix(position - 1) };

            current = match (segment, current) {
                (_, Value::Null) => {
                    tracing::trace!("'{}' passes through null at '{}'", path, parent_path);
                    return Ok(Resolved::Missing);
                },
                (PathSegment::Key(key), Value::Object(map)) => match map.get(key) {
                    Some(value) => value,
                    None if self.strict => {
                        return Err(PathError::Undefined { path: parent_path, segment: key.clone() });
                    },
                    None => return Ok(Resolved::Missing),
                },
                (PathSegment::Key(key), _) => {
                    return Err(PathError::NotAnObject { path: parent_path, segment: key.clone() });
                },
                (PathSegment::Index(index), Value::Array(items)) => match items.get(*index) {
                    Some(value) => value,
                    None => {
                        return Err(PathError::OutOfBounds { path: parent_path, index: *index, length: items.len() });
                    },
                },
                (PathSegment::Index(index), _) => {
                    return Err(PathError::NotAnArray { path: parent_path, index: *index });
                },
            };
        }

        Ok(match current {
            Value::Null => Resolved::Null,
            value => Resolved::Value(value),
        })
    }
}
