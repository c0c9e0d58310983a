pub mod node;
pub use node::*;

pub mod syntax_tree;
pub use syntax_tree::*;

pub mod statement;
pub use statement::*;

pub mod condition_parser;
pub use condition_parser::*;

pub mod expression_parser;
pub use expression_parser::*;

pub mod predicate;
pub use predicate::*;

pub mod operand_parser;
pub use operand_parser::*;

pub mod args_parser;
pub use args_parser::*;

pub mod param_parser;
pub use param_parser::*;

pub mod limit_offset_parser;
pub use limit_offset_parser::*;

pub mod set_parser;
pub use set_parser::*;

pub mod values_parser;
pub use values_parser::*;
