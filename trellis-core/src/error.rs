use thiserror::Error;

use crate::template::BindingPath;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse expression `{text}`")]
    MalformedExpression { text: String },

    #[error("could not find template root `{0}`")]
    RootNotFound(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("index {index} is out of bounds for a list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("binding path {path} does not resolve inside the row")]
    UnresolvedPath { path: BindingPath },

    #[error("invalid markup at offset {offset}: {message}")]
    Markup { offset: usize, message: String },
}
