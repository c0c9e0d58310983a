use serde::{Deserialize, Serialize};
use serde_json::Value;

/// SQL with positional `?` markers and the values to bind, in marker order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub sql: String,
    pub values: Vec<Value>,
}

impl ExecutionResult {
    pub fn new(sql: String, values: Vec<Value>) -> Self {
        Self { sql, values }
    }
}
