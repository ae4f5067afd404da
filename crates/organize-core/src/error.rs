//! Error types for organize-core

use std::path::PathBuf;

/// Result type for organize-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in organize-core operations
///
/// Errors fall into three groups:
///
/// - configuration errors reject a rule before it runs,
/// - entry errors fail a single entry and the run continues,
/// - fatal errors (see [`Error::is_fatal`]) abort the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed rule or document
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// No filter or action is registered under this tag
    #[error("Unknown {kind} '{tag}'")]
    UnknownTag { kind: &'static str, tag: String },

    /// Parameters for a registered tag could not be interpreted
    #[error("Invalid parameters for '{tag}': {message}")]
    InvalidParams { tag: String, message: String },

    /// Template could not be parsed or rendered
    #[error("Invalid template '{template}': {message}")]
    Template { template: String, message: String },

    /// Two filters would contribute the same attribute key
    #[error("Attribute '{key}' is already provided by another filter")]
    AttributeCollision { key: String },

    /// Template references an attribute no filter provided
    #[error("Missing attribute '{key}'")]
    MissingAttribute { key: String },

    /// A computed file name is not a plain file name
    #[error("Invalid file name '{name}': names must not contain a path separator")]
    InvalidName { name: String },

    /// Location to scan does not exist
    #[error("Location not found: {path}")]
    LocationNotFound { path: PathBuf },

    /// Location could not be enumerated
    #[error("Failed to scan location {path}: {message}")]
    Scan { path: PathBuf, message: String },

    #[error("Unsupported rules format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to parse {format} rules at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// Filesystem error from organize-fs
    #[error(transparent)]
    Fs(#[from] organize_fs::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn template(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LocationNotFound { .. } | Self::Scan { .. })
    }
}
