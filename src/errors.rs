//! Error types for quiz conversion
//!
//! Every failure of a document conversion is a [`ConversionError`]. Errors
//! raised while reading a single question are wrapped in
//! [`ConversionError::InQuestion`] so callers can tell which question of the
//! document broke; [`ConversionError::root_cause`] strips that context again.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Dialect;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Top-level conversion error type
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The question discriminator (Moodle `type`, QML `QTYPE`) is not one of
    /// the supported question types
    #[error("Unsupported {dialect} question type: {found:?}")]
    UnsupportedType { dialect: Dialect, found: String },

    /// Required element or attribute is missing
    #[error("Missing required element: {0}")]
    MissingField(String),

    /// Element is present but its value cannot be used
    #[error("Invalid value {value:?} for {field}")]
    InvalidValue { field: String, value: String },

    /// Source is not well-formed XML, or not a document of the expected dialect
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Failure attributed to one question of the document
    #[error("Question #{number} ({name:?}): {source}")]
    InQuestion {
        number: usize,
        name: String,
        #[source]
        source: Box<ConversionError>,
    },

    /// XML serialization failed
    #[error("Failed to write XML: {0}")]
    Write(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConversionError {
    /// Attach question context to an error raised while reading that question
    pub fn in_question(number: usize, name: &str, error: ConversionError) -> Self {
        ConversionError::InQuestion {
            number,
            name: name.to_string(),
            source: Box::new(error),
        }
    }

    /// The underlying error, without question context
    pub fn root_cause(&self) -> &ConversionError {
        match self {
            ConversionError::InQuestion { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn missing(field: &str) -> Self {
        ConversionError::MissingField(field.to_string())
    }

    pub(crate) fn invalid(field: &str, value: &str) -> Self {
        ConversionError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConversionError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Cannot read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    Parse(#[from] serde_yaml::Error),
}
