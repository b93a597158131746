use thiserror::Error;

#[derive(Error, Debug)]
pub enum YamlError {
    #[error("replacement value must not be empty")]
    EmptyValue,

    #[error("key {path} not found")]
    KeyNotFound { path: String },

    #[error("invalid key path '{input}': {message}")]
    InvalidKeyPath { input: String, message: String },

    #[error("edit error: {0}")]
    Edit(#[from] crate::edit::EditError),
}
