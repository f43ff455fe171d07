use std::path::PathBuf;
use thiserror::Error;

/// Result type for dcmsort operations
pub type Result<T> = std::result::Result<T, SortError>;

/// Error types for dcmsort operations
#[derive(Error, Debug)]
pub enum SortError {
    /// Input root does not exist; raised before any mutation
    #[error("Input dir does not exist: {}", path.display())]
    InputRootMissing { path: PathBuf },

    /// Directory could not be created
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File copy failed
    #[error("Failed to copy {} to {}: {error}", source.display(), destination.display())]
    Copy {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// File move failed
    #[error("Failed to move {} to {}: {error}", source.display(), destination.display())]
    Move {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// File or directory removal failed
    #[error("Failed to remove {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory listing or traversal failed
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SortError {
    pub fn create_directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SortError::CreateDirectory {
            path: path.into(),
            source,
        }
    }

    pub fn copy(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        error: std::io::Error,
    ) -> Self {
        SortError::Copy {
            source: source.into(),
            destination: destination.into(),
            error,
        }
    }

    pub fn move_failed(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        error: std::io::Error,
    ) -> Self {
        SortError::Move {
            source: source.into(),
            destination: destination.into(),
            error,
        }
    }

    pub fn remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SortError::Remove {
            path: path.into(),
            source,
        }
    }

    pub fn read_directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SortError::ReadDirectory {
            path: path.into(),
            source,
        }
    }
}
