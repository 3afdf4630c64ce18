//! Error types for the banstat library.
//!
//! Most "failures" in this domain are data, not errors: a segment identifier
//! that is missing from the test plan comes back as a structured error
//! record, an unparseable date becomes an absent date, and a zero-length
//! plan row yields 0% coverage. The variants here cover what is left —
//! configuration problems, violated input contracts, and the mandatory
//! reference fields a plan row must carry.

use std::io;

use thiserror::Error;

/// Main result type for banstat operations.
pub type Result<T> = std::result::Result<T, BanstatError>;

/// Error type for all banstat operations.
#[derive(Error, Debug)]
pub enum BanstatError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
    },

    /// A matched plan row is missing a mandatory reference field.
    ///
    /// `ID` and `Bandel` must always be supplied by the upstream plan
    /// export; their absence signals corrupt data and is fatal for that
    /// row rather than silently defaulted.
    #[error("Test plan row '{}' is missing mandatory field '{field}'", .une_id.as_deref().unwrap_or("?"))]
    MissingMandatoryField {
        /// Name of the absent plan column
        field: String,
        /// Normalized segment identifier of the offending row, when known
        une_id: Option<String>,
    },

    /// I/O related errors (config file reads/writes)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl BanstatError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new missing-mandatory-field error for a plan row
    pub fn missing_field(field: impl Into<String>, une_id: Option<&str>) -> Self {
        Self::MissingMandatoryField {
            field: field.into(),
            une_id: une_id.map(ToOwned::to_owned),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}

impl From<io::Error> for BanstatError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for BanstatError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for BanstatError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BanstatError::config("Invalid configuration");
        assert!(matches!(err, BanstatError::Config { .. }));

        let err = BanstatError::validation("Bad interval");
        assert!(matches!(err, BanstatError::Validation { .. }));
    }

    #[test]
    fn test_config_field_error() {
        let err = BanstatError::config_field("Empty column name", "plan.une_id");

        if let BanstatError::Config { message, field } = err {
            assert_eq!(message, "Empty column name");
            assert_eq!(field, Some("plan.une_id".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_missing_field_display_includes_identifier() {
        let err = BanstatError::missing_field("Bandel", Some("LDN3A"));
        let display = format!("{}", err);
        assert!(display.contains("'Bandel'"));
        assert!(display.contains("LDN3A"));

        let anonymous = BanstatError::missing_field("ID", None);
        let display = format!("{}", anonymous);
        assert!(display.contains("'ID'"));
        assert!(display.contains("'?'"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: BanstatError = io_err.into();

        assert!(matches!(err, BanstatError::Io { .. }));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: BanstatError = json_err.into();

        assert!(matches!(err, BanstatError::Serialization { .. }));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: BanstatError = yaml_err.into();

        assert!(matches!(err, BanstatError::Serialization { .. }));
    }
}
