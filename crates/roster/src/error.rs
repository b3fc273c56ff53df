//! Error types for roster.
//!
//! This module defines all error types used throughout the roster crate,
//! providing detailed context for debugging and user-friendly error messages.

use crate::record::RecordId;
use thiserror::Error;

/// The main error type for roster operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    /// A required draft field was left empty.
    #[error("{field} is required")]
    MissingField {
        /// Human-readable name of the missing field.
        field: &'static str,
    },

    /// A group name outside the fixed enumeration was supplied.
    #[error("unknown group '{0}' (expected one of: React, Java, Flutter, Python)")]
    UnknownGroup(String),

    // === Form Errors ===
    /// A form operation was attempted while no form is open.
    #[error("no form is open; use 'add' or 'edit <ref>' first")]
    FormNotOpen,

    /// A form was opened while another one is still open.
    #[error("a form is already open ({mode}); submit or cancel it first")]
    FormAlreadyOpen {
        /// Title of the form that is currently open.
        mode: &'static str,
    },

    // === Reference Errors ===
    /// No record carries the given id.
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    /// A row number outside the displayed table was supplied.
    #[error("no row {0} in the current view")]
    NoSuchRow(usize),

    /// An id prefix matched no record.
    #[error("no record matches '{0}'")]
    UnknownReference(String),

    /// An id prefix matched more than one record.
    #[error("'{0}' matches more than one record; use a longer id prefix")]
    AmbiguousReference(String),

    // === Shell Errors ===
    /// The shell did not recognise a command word.
    #[error("unknown command '{0}'; type 'help' for a list of commands")]
    UnknownCommand(String),

    /// A shell command received a malformed argument.
    #[error("{command}: {message}")]
    InvalidArgument {
        /// The command being parsed.
        command: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for roster operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid argument error for a shell command.
    #[must_use]
    pub fn invalid_argument(command: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command,
            message: message.into(),
        }
    }

    /// Check if this error is a user-input validation failure.
    ///
    /// Validation failures leave the form open so the user can fix the draft.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::UnknownGroup(_))
    }

    /// Check if this error refers to a record that does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound(_) | Self::NoSuchRow(_) | Self::UnknownReference(_)
        )
    }
}
