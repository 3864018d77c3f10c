//! Error types for the analysis engine

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the analysis entry points
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A parameter was outside its accepted range
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        name: &'static str,
        message: String,
    },

    /// An entity id was requested that the dataset does not contain
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// The same entity id was supplied twice while building a dataset
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
