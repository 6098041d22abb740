//! Error types for I/O operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing frame files
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Invalid file format: {format}")]
    InvalidFormat { format: String },

    #[error("Parse error in {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Face {face} in {path} references vertex {index} of {count}")]
    IndexOutOfRange {
        path: PathBuf,
        face: usize,
        index: usize,
        count: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for meshseq_core::Error {
    fn from(err: IoError) -> Self {
        match err {
            IoError::InvalidFormat { format } => meshseq_core::Error::UnsupportedFormat(format),
            IoError::ParseError { path, message } => meshseq_core::Error::Parse { path, message },
            IoError::IndexOutOfRange { ref path, .. } => meshseq_core::Error::Parse {
                path: path.clone(),
                message: err.to_string(),
            },
            IoError::Io(e) => meshseq_core::Error::Io(e),
        }
    }
}
