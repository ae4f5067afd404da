//! Error types for organize-fs

use std::path::PathBuf;

/// Result type for organize-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in organize-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path has no file name: {path}")]
    NoFileName { path: PathBuf },

    #[error("Could not determine the home directory")]
    HomeDirNotFound,

    #[error("No trash location is available on this system")]
    TrashUnavailable,

    #[error("Failed to move {path} to the trash: {message}")]
    Trash { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
