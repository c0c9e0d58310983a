use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid property path '{path}': {message}")]
    Syntax { path: String, message: String },

    #[error("'{segment}' cannot be read, the value at '{path}' is not an object")]
    NotAnObject { path: String, segment: String },

    #[error("[{index}] cannot be read, the value at '{path}' is not an array")]
    NotAnArray { path: String, index: usize },

    #[error("index {index} is out of bounds for '{path}' (length {length})")]
    OutOfBounds { path: String, index: usize, length: usize },

    #[error("property '{segment}' is not defined at '{path}'")]
    Undefined { path: String, segment: String },
}
