pub mod path_error;
pub use path_error::*;

pub mod property_path;
pub use property_path::*;

pub mod evaluator;
pub use evaluator::*;
