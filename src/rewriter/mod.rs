pub mod span_rewriter;
pub use span_rewriter::*;

pub mod param_resolver;
pub use param_resolver::*;

pub mod clause_listener;
pub use clause_listener::*;

pub mod deletion;
pub use deletion::*;

#[cfg(test)]
mod _tests;
