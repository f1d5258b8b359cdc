//! Error types for the roombook core library

use std::{error::Error as StdError, fmt};

/// Main error type for roombook core operations
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Validation error
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a validation error for a single field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Validation { field, message } => {
                write!(f, "Validation error: {field} - {message}")
            }
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Report the first failing field; the form is rejected as a whole anyway.
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        fields
            .into_iter()
            .next()
            .map_or_else(
                || Self::Other(errors.to_string()),
                |(field, errs)| {
                    let message = errs
                        .first()
                        .and_then(|e| e.message.as_ref().map(ToString::to_string))
                        .unwrap_or_else(|| "invalid value".to_string());
                    Self::validation(field.to_string(), message)
                },
            )
    }
}
