//! Error types for rankscape-core.

use std::path::{Path, PathBuf};

/// Errors that can occur while scoring, ranking, or loading test cases.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// I/O error, optionally tied to the path being accessed.
    #[error("I/O error{}: {source}", path_suffix(.path))]
    Io {
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path involved in the failed operation, if known
        path: Option<PathBuf>,
    },

    /// Input could not be parsed (TOML, JSON, dates, ...).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input value is out of its valid domain.
    #[error("Validation error: {}{message}", field_prefix(.field))]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A name did not match any known sort option.
    #[error("Unknown sort option: {name}")]
    UnknownSortOption {
        /// Name that failed to parse
        name: String,
    },

    /// A scale was paired with a sort option of a different family.
    #[error("Scale '{scale}' cannot be used with sort option {sort}")]
    ScaleMismatch {
        /// Sort option name
        sort: String,
        /// Scale label
        scale: String,
    },

    /// Generic operation failure (serialization, encoding, ...).
    #[error("Operation failed: {0}")]
    Operation(String),
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

fn field_prefix(field: &Option<String>) -> String {
    field.as_ref().map(|f| format!("{f}: ")).unwrap_or_default()
}

/// Convenience `Result` type alias for Rankscape operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source, path: None }
    }
}

impl Error {
    /// Creates an I/O error that records the path involved.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            source,
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Creates a new parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse(message.into())
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new generic operation error.
    pub fn operation<S: Into<String>>(message: S) -> Self {
        Error::Operation(message.into())
    }
}
