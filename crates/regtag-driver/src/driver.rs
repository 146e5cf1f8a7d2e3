//! # Storage Driver Abstraction
//!
//! The tag index is layered over a path-addressed byte store with no
//! transactions and no secondary indexes. [`StorageDriver`] is the whole
//! capability set the tag index consumes; any backend offering it is
//! interchangeable.
//!
//! ## Contract
//!
//! - `get_content` returns the bytes of a file, or `PathNotFound`.
//! - `put_content` overwrites unconditionally, creating parent directories.
//! - `list` returns the full paths of a directory's immediate children, or
//!   `PathNotFound` if the directory does not exist.
//! - `delete` removes a file or a whole directory subtree, or reports
//!   `PathNotFound` if nothing is there.
//!
//! Implementations must be `Send + Sync`: one driver is shared by every
//! task touching a registry.

use async_trait::async_trait;

use crate::error::DriverError;

/// Path-addressed storage backend.
#[async_trait]
pub trait StorageDriver: Send + Sync {
    /// Human-readable backend name (for diagnostics/logging).
    fn name(&self) -> &'static str;

    /// Read the full content of the file at `path`.
    async fn get_content(&self, path: &str) -> Result<Vec<u8>, DriverError>;

    /// Write `content` to `path`, replacing any existing file.
    async fn put_content(&self, path: &str, content: &[u8]) -> Result<(), DriverError>;

    /// List the immediate children of the directory at `path`.
    async fn list(&self, path: &str) -> Result<Vec<String>, DriverError>;

    /// Delete the file or directory subtree at `path`.
    async fn delete(&self, path: &str) -> Result<(), DriverError>;
}
