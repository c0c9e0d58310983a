pub mod config;
pub use config::*;

pub mod param_info;
pub use param_info::*;

pub mod execution_result;
pub use execution_result::*;

pub mod template;
pub use template::*;

pub mod registry;
pub use registry::*;
