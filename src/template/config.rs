use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Fail when a key is absent from an object instead of treating it as null.
    pub strict_paths: bool,
    /// Re-lex the produced SQL and check it against the bound values.
    pub verify_output: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self { strict_paths: false, verify_output: true }
    }
}

impl TemplateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(strict_paths: bool, verify_output: bool) -> Self {
        Self { strict_paths, verify_output }
    }

    pub fn strict() -> Self {
        Self { strict_paths: true, ..Self::default() }
    }

    pub fn lenient() -> Self {
        Self { strict_paths: false, verify_output: false }
    }
}
