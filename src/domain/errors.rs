// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration tree.
//!
//! This module defines the error types that can occur when mutating a tree, loading
//! raw data from a source, or assembling a tree from several sources. All errors use
//! `thiserror` for proper error handling and conversion.

use thiserror::Error;

/// The main error type for configuration operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without breaking
/// backwards compatibility.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::errors::ConfigError;
///
/// fn seal() -> Result<(), ConfigError> {
///     Err(ConfigError::ReadOnlyViolation { operation: "set" })
/// }
///
/// assert!(seal().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A mutating operation was attempted on a node that does not allow modification.
    #[error("Configuration is read only: {operation} rejected")]
    ReadOnlyViolation {
        /// The rejected operation (`set`, `unset`, `append`, `merge`, ...)
        operation: &'static str,
    },

    /// No integer key is left to append under; the highest possible one is in use.
    #[error("No integer key left: {operation} rejected")]
    IndexExhausted {
        /// The rejected operation (`append` or `merge`)
        operation: &'static str,
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

    /// Failed to parse configuration content.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A source descriptor handed to the assembler is malformed.
    #[error("Invalid source descriptor at position '{position}': {message}")]
    InvalidDescriptor {
        /// Position of the offending descriptor in the descriptor list
        position: String,
        /// What is wrong with it
        message: String,
        /// The error raised while building the source, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A source descriptor names a source type that has not been registered.
    #[error("Unknown source type '{source_type}' at position '{position}'")]
    UnknownSourceType {
        /// Position of the offending descriptor in the descriptor list
        position: String,
        /// The unregistered type identifier
        source_type: String,
    },

    /// A source factory could not be registered.
    #[error("Cannot register source type '{source_type}': {message}")]
    InvalidRegistration {
        /// The identifier that was rejected
        source_type: String,
        /// Why it was rejected
        message: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `SourceError` without an underlying cause.
    pub fn source_error(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::SourceError {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates an `InvalidDescriptor` error for the given position.
    pub fn invalid_descriptor(position: impl ToString, message: impl Into<String>) -> Self {
        ConfigError::InvalidDescriptor {
            position: position.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error was caused by a read-only node.
    pub fn is_read_only(&self) -> bool {
        matches!(self, ConfigError::ReadOnlyViolation { .. })
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
