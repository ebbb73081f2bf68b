//! Error types for synth-fs

use std::path::PathBuf;

/// Result type for synth-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating, reading or decoding documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document '{id}' not found under {searched}")]
    DocumentNotFound { id: String, searched: String },

    #[error("Document too large: {path} is {size} bytes (max {max})")]
    DocumentTooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to parse {format} document '{document}': {message}")]
    ConfigParse {
        document: String,
        format: String,
        message: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
