// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error taxonomy shared by every layer of the crate.
//! All errors use `thiserror` for proper error handling and conversion.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// A single violation reported by a schema while validating a namespace.
///
/// # Examples
///
/// ```
/// use schemacfg::domain::errors::ValidationMessage;
///
/// let message = ValidationMessage::new("app.name", "The mandatory item 'app.name' is missing.");
/// assert_eq!(message.path(), "app.name");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationMessage {
    path: String,
    message: String,
}

impl ValidationMessage {
    /// Creates a new message for the item at `path`.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the dot-delimited path of the offending item.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The main error type for configuration operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use schemacfg::domain::errors::ConfigError;
///
/// fn get_config_value() -> Result<String, ConfigError> {
///     Err(ConfigError::unknown_option("database.host", "Missing config schema for \"database\""))
/// }
///
/// let err = get_config_value().unwrap_err();
/// assert_eq!(err.path(), Some("database.host"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested path is empty, malformed, has no registered schema for its
    /// namespace, does not exist after a successful build, or conflicts with
    /// existing non-container data on `set`.
    #[error("{message}")]
    UnknownOption {
        /// The offending path
        path: String,
        /// The error message
        message: String,
    },

    /// A schema rejected the raw values of a namespace.
    #[error("{}", summarize(.messages))]
    ValidationFailed {
        /// Every violation reported by the schema
        messages: Vec<ValidationMessage>,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration file or value.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn summarize(messages: &[ValidationMessage]) -> String {
    match messages {
        [] => "Configuration validation failed".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

impl ConfigError {
    /// Creates an `UnknownOption` error for `path`.
    pub fn unknown_option(path: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::UnknownOption {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns the offending path of an `UnknownOption` error.
    pub fn path(&self) -> Option<&str> {
        match self {
            ConfigError::UnknownOption { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns every validation message of a `ValidationFailed` error.
    ///
    /// Any other variant yields an empty slice.
    pub fn messages(&self) -> &[ValidationMessage] {
        match self {
            ConfigError::ValidationFailed { messages } => messages,
            _ => &[],
        }
    }

    /// Returns `true` for errors that mean "this path is not available".
    pub fn is_unknown_option(&self) -> bool {
        matches!(self, ConfigError::UnknownOption { .. })
    }

    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError for a value of the wrong shape.
    pub fn type_mismatch(key: impl Into<String>, target_type: &str, found: &str) -> Self {
        ConfigError::TypeConversionError {
            key: key.into(),
            target_type: target_type.to_string(),
            source: format!("found {}", found).into(),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_option_error() {
        let error = ConfigError::unknown_option("cache.ttl", "Missing config schema for \"cache\"");
        assert_eq!(error.to_string(), "Missing config schema for \"cache\"");
        assert_eq!(error.path(), Some("cache.ttl"));
        assert!(error.is_unknown_option());
    }

    #[test]
    fn test_validation_failed_single_message() {
        let error = ConfigError::ValidationFailed {
            messages: vec![ValidationMessage::new(
                "app.name",
                "The mandatory item 'app.name' is missing.",
            )],
        };
        assert_eq!(
            error.to_string(),
            "The mandatory item 'app.name' is missing."
        );
        assert_eq!(error.messages().len(), 1);
        assert_eq!(error.path(), None);
        assert!(!error.is_unknown_option());
    }

    #[test]
    fn test_validation_failed_keeps_every_message() {
        let error = ConfigError::ValidationFailed {
            messages: vec![
                ValidationMessage::new("db.host", "first"),
                ValidationMessage::new("db.port", "second"),
                ValidationMessage::new("db.user", "third"),
            ],
        };
        assert_eq!(error.to_string(), "first (and 2 more)");
        let paths: Vec<_> = error.messages().iter().map(|m| m.path()).collect();
        assert_eq!(paths, vec!["db.host", "db.port", "db.user"]);
    }

    #[test]
    fn test_type_conversion_error() {
        let source_error = "invalid value".parse::<i32>().unwrap_err();
        let error = ConfigError::TypeConversionError {
            key: "test.key".to_string(),
            target_type: "i32".to_string(),
            source: Box::new(source_error),
        };
        assert!(error.to_string().contains("test.key"));
        assert!(error.to_string().contains("i32"));
    }

    #[test]
    fn test_type_mismatch() {
        let error = ConfigError::type_mismatch("db.port", "integer", "string");
        assert!(matches!(error, ConfigError::TypeConversionError { .. }));
        assert!(error.to_string().contains("found string"));
    }

    #[test]
    fn test_source_error() {
        let error = ConfigError::SourceError {
            source_name: "env".to_string(),
            message: "Failed to read environment".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Configuration source 'env' error: Failed to read environment"
        );
    }

    #[test]
    fn test_parse_error() {
        let error = ConfigError::ParseError {
            message: "Invalid YAML".to_string(),
            source: None,
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration: Invalid YAML"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = ConfigError::from(io_error);
        assert!(matches!(error, ConfigError::IoError(_)));
    }

    #[test]
    fn test_from_parse_int_error() {
        let parse_err = "not_a_number".parse::<i64>().unwrap_err();
        let error = ConfigError::from_parse_int_error("test.key".to_string(), parse_err);
        assert!(error.to_string().contains("integer"));
    }

    #[test]
    fn test_from_parse_float_error() {
        let parse_err = "not_a_float".parse::<f64>().unwrap_err();
        let error = ConfigError::from_parse_float_error("test.key".to_string(), parse_err);
        assert!(error.to_string().contains("float"));
    }

    #[test]
    fn test_from_parse_bool_error() {
        let parse_err = "not_a_bool".parse::<bool>().unwrap_err();
        let error = ConfigError::from_parse_bool_error("test.key".to_string(), parse_err);
        assert!(error.to_string().contains("boolean"));
    }
}
