//! Storage driver error types.

/// Errors returned by a [`StorageDriver`](crate::StorageDriver).
///
/// `PathNotFound` is the one kind callers routinely branch on: it is how a
/// driver reports absence, as opposed to failure.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Nothing exists at the path.
    #[error("path not found: {path}")]
    PathNotFound { path: String },

    /// The path does not satisfy the driver path syntax.
    #[error("invalid path: {path:?}")]
    InvalidPath { path: String },

    /// A file operation was attempted on a directory, or a directory was
    /// needed where a file exists.
    #[error("not a file: {path}")]
    NotAFile { path: String },

    /// The stored content at the path could not be interpreted.
    #[error("invalid content at {path}: {reason}")]
    InvalidContent { path: String, reason: String },

    /// Local I/O failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl DriverError {
    /// Returns `true` if this error reports absence rather than failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }

    pub(crate) fn from_io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::PathNotFound {
                path: path.to_string(),
            }
        } else {
            Self::Io {
                path: path.to_string(),
                source,
            }
        }
    }
}
