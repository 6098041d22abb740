//! Error types for meshseq

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for meshseq operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("No frames are found for pattern {pattern}")]
    NoFramesFound { pattern: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("No sequence is loaded")]
    NotLoaded,
}

impl Error {
    /// Errors after which the viewer cannot keep running.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::NoFramesFound { .. } | Error::CreateDirectory { .. } | Error::Render(_)
        )
    }
}

/// Result type alias for meshseq operations
pub type Result<T> = std::result::Result<T, Error>;
