//! Error types for the filter expression builder

use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyTypeError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Main error type for filter construction and (de)serialization
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid filter input: {0}")]
    InvalidFilterInput(String),

    #[error("Invalid filter operation: {0}")]
    InvalidFilterOperation(String),

    #[error("Invalid filter shape: {0}")]
    InvalidFilterShape(String),

    #[error("Invalid builder context: {0}")]
    InvalidBuilderContext(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<serde_json::Error> for FilterError {
    fn from(err: serde_json::Error) -> Self {
        FilterError::DeserializationError(err.to_string())
    }
}

impl From<FilterError> for PyErr {
    fn from(err: FilterError) -> PyErr {
        let msg = err.to_string();
        match err {
            FilterError::InvalidFilterInput(_) => PyTypeError::new_err(msg),
            FilterError::InvalidFilterOperation(_)
            | FilterError::InvalidFilterShape(_)
            | FilterError::InvalidArgument(_)
            | FilterError::DeserializationError(_) => PyValueError::new_err(msg),
            FilterError::InvalidBuilderContext(_) => PyRuntimeError::new_err(msg),
            FilterError::ElementNotFound(_) => PyKeyError::new_err(msg),
        }
    }
}

/// Result type alias for the filter expression builder
pub type Result<T> = std::result::Result<T, FilterError>;
