//! Error types for rankscape-render.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for rankscape-render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering plots.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from rankscape-core (validation, grids, ...).
    #[error("Core error: {0}")]
    Core(#[from] rankscape_core::Error),

    /// Image encoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Manifest serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error on a specific path.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path being written or read
        path: PathBuf,
    },

    /// Invalid rendering parameters.
    #[error("Render error: {message}")]
    Render {
        /// What is wrong
        message: String,
    },
}

impl Error {
    /// Creates an I/O error tied to `path`.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            source,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a new render error.
    pub fn render<S: Into<String>>(message: S) -> Self {
        Error::Render {
            message: message.into(),
        }
    }
}
