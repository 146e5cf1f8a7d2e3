//! # Filesystem Driver
//!
//! A [`StorageDriver`] rooted at a local directory. Driver path `/a/b` maps
//! to `{root}/a/b`. Writes go to a temporary sibling file that is renamed
//! over the target, so readers observe either the old or the new content
//! and never a torn write.
//!
//! Unlike the in-memory driver, directories are real: deleting the last
//! entry of a directory leaves the (empty) directory behind, and listing it
//! returns no children rather than `PathNotFound`.
//!
//! A write racing with a delete of an enclosing directory is retried, so
//! `put_content` never reports `PathNotFound` and a subtree delete never
//! fails because a concurrent write refilled it.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;

use crate::driver::StorageDriver;
use crate::error::DriverError;
use crate::path::{check_list_path, check_path};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Attempts allowed when a write or delete races with a concurrent change
/// to the same subtree.
const RACE_RETRIES: usize = 32;

/// Storage driver backed by a local directory tree.
#[derive(Debug, Clone)]
pub struct FilesystemDriver {
    root: PathBuf,
}

impl FilesystemDriver {
    /// Create a driver rooted at `root`.
    ///
    /// The directory does not need to exist yet; it is created on the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Return the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

#[async_trait]
impl StorageDriver for FilesystemDriver {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn get_content(&self, path: &str) -> Result<Vec<u8>, DriverError> {
        check_path(path)?;
        tracing::trace!(driver = self.name(), path, "get_content");
        let full = self.full_path(path);
        match fs::read(&full).await {
            Ok(content) => Ok(content),
            Err(_) if is_dir(&full).await => Err(DriverError::NotAFile {
                path: path.to_string(),
            }),
            Err(e) => Err(DriverError::from_io(path, e)),
        }
    }

    async fn put_content(&self, path: &str, content: &[u8]) -> Result<(), DriverError> {
        check_path(path)?;
        tracing::trace!(driver = self.name(), path, len = content.len(), "put_content");
        let full = self.full_path(path);
        if is_dir(&full).await {
            return Err(DriverError::NotAFile {
                path: path.to_string(),
            });
        }
        let file_name = full
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DriverError::InvalidPath {
                path: path.to_string(),
            })?
            .to_string();

        // A concurrent subtree delete can remove the parent between any two
        // steps of the write. Start over from `create_dir_all` when it does.
        let mut attempt = 0;
        loop {
            match write_atomic(&full, &file_name, content).await {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound && attempt < RACE_RETRIES => {
                    attempt += 1;
                    tracing::debug!(path, attempt, "parent removed during write, retrying");
                    tokio::task::yield_now().await;
                }
                // Writes never report `PathNotFound`.
                Err(source) => {
                    return Err(DriverError::Io {
                        path: path.to_string(),
                        source,
                    })
                }
            }
        }
    }

    async fn list(&self, path: &str) -> Result<Vec<String>, DriverError> {
        check_list_path(path)?;
        tracing::trace!(driver = self.name(), path, "list");
        let full = self.full_path(path);
        let meta = fs::metadata(&full)
            .await
            .map_err(|e| DriverError::from_io(path, e))?;
        if !meta.is_dir() {
            return Err(DriverError::NotAFile {
                path: path.to_string(),
            });
        }

        let prefix = if path == "/" { "" } else { path };
        let mut entries = fs::read_dir(&full)
            .await
            .map_err(|e| DriverError::from_io(path, e))?;
        let mut children = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DriverError::from_io(path, e))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::warn!(path, entry = ?name, "skipping non UTF-8 directory entry");
                continue;
            };
            if name.starts_with('.') && name.contains(".tmp-") {
                continue;
            }
            children.push(format!("{prefix}/{name}"));
        }
        children.sort();
        Ok(children)
    }

    async fn delete(&self, path: &str) -> Result<(), DriverError> {
        check_path(path)?;
        tracing::trace!(driver = self.name(), path, "delete");
        let full = self.full_path(path);
        let mut attempt = 0;
        loop {
            let meta = match fs::symlink_metadata(&full).await {
                Ok(meta) => meta,
                // Removed by a concurrent delete between attempts.
                Err(e) if attempt > 0 && e.kind() == io::ErrorKind::NotFound => return Ok(()),
                Err(e) => return Err(DriverError::from_io(path, e)),
            };
            let result = if meta.is_dir() {
                fs::remove_dir_all(&full).await
            } else {
                fs::remove_file(&full).await
            };
            match result {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
                // A concurrent write recreated an entry inside the subtree.
                Err(e) if meta.is_dir() && attempt < RACE_RETRIES => {
                    attempt += 1;
                    tracing::debug!(path, attempt, error = %e, "subtree changed during delete, retrying");
                    tokio::task::yield_now().await;
                }
                Err(e) => return Err(DriverError::from_io(path, e)),
            }
        }
    }
}

/// Create `full`'s parent, write `content` to a temporary sibling and
/// rename it over `full`.
async fn write_atomic(full: &Path, file_name: &str, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).await?;
    }
    let temp = full.with_file_name(format!(
        ".{file_name}.tmp-{}-{}",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    fs::write(&temp, content).await?;
    if let Err(e) = fs::rename(&temp, full).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e);
    }
    Ok(())
}
