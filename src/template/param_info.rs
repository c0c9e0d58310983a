use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::parser::ast::SyntaxTree;

/// Name and kind of one placeholder found in a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamInfo {
    pub name: String,
    pub required: bool,
}

impl ParamInfo {
    pub fn new(name: &str, required: bool) -> Self {
        Self { name: name.to_string(), required }
    }

    /// Every placeholder of the tree, nested statements included, in order
    /// of first appearance.
    pub fn collect(tree: &SyntaxTree) -> IndexSet<ParamInfo> {
        tree.placeholders_within(tree.root(), true)
            .into_iter()
            .filter_map(|id| tree.placeholder(id))
            .map(|p| ParamInfo::new(p.name(), p.required))
            .collect()
    }
}
