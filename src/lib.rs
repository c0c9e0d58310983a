pub mod parser;
pub mod property;
pub mod rewriter;
pub mod template;

pub mod error;
pub use error::TemplateError;

pub use template::{ExecutionResult, ParamInfo, Registry, RegistryCommon, RegistryRunner, Template, TemplateConfig};
