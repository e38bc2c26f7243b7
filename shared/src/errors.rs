//! Shared error types for the quotebook workspace

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Field must not be empty: {field}")]
    EmptyField { field: &'static str },

    #[error("Category name is reserved: {name}")]
    ReservedCategory { name: String },

    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
