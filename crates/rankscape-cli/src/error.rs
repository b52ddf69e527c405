//! Error types for rankscape-cli

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for rankscape-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rankscape-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from rankscape-core
    #[error("Core error: {0}")]
    Core(#[from] rankscape_core::Error),

    /// Error from rankscape-render
    #[error("Render error: {0}")]
    Render(#[from] rankscape_render::Error),

    /// JSON output error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error on a specific path
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path being read or written
        path: PathBuf,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error tied to `path`.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            source,
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = Error::config("bad resolution");
        assert_eq!(err.to_string(), "Configuration error: bad resolution");
    }

    #[test]
    fn test_core_error_wraps() {
        let err: Error = rankscape_core::Error::validation_field("distance", "nope").into();
        assert!(matches!(err, Error::Core(_)));
        assert!(err.to_string().starts_with("Core error:"));
    }
}
