use thiserror::Error;

use crate::{parser::ParseError, property::PathError};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("required parameter '{name}' is null or missing")]
    RequiredParameter { name: String },

    #[error("cannot resolve '{name}': {source}")]
    Path { name: String, source: PathError },

    #[error("batch insert values differ in size: expected {expected}, found {found}")]
    InconsistentBatchSize { expected: usize, found: usize },

    #[error("insert value '{name}' must use a required placeholder")]
    OptionalInsertValue { name: String },

    #[error("expected a single placeholder in expression, found {count}")]
    MultiplePlaceholders { count: usize },

    #[error("collection '{name}' is empty")]
    EmptyCollection { name: String },

    #[error("every SET assignment was removed")]
    EmptySetClause,

    #[error("every predicate of the join condition at token {keyword} was removed")]
    EmptyJoinCondition { keyword: usize },

    #[error("rewrite invariant violated: {0}")]
    Invariant(String),

    #[error("unknown statement: {0}")]
    UnknownStatement(String),

    #[error("failed to load templates: {0}")]
    Load(String),
}

impl TemplateError {
    pub fn invariant(message: impl Into<String>) -> Self {
        TemplateError::Invariant(message.into())
    }
}
