//! # In-Memory Driver
//!
//! A [`StorageDriver`] over a sorted map of file paths to contents.
//! Directories are implicit: a directory exists exactly while some file
//! lives beneath it, so deleting the last file of a directory makes the
//! directory itself disappear.
//!
//! Intended for tests and single-process deployments; contents do not
//! survive a restart.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::driver::StorageDriver;
use crate::error::DriverError;
use crate::path::{check_list_path, check_path, components};

/// In-memory storage driver.
#[derive(Debug, Default)]
pub struct InMemoryDriver {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryDriver {
    /// Create an empty driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently stored.
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }
}

fn dir_prefix(path: &str) -> String {
    if path == "/" {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

fn is_dir(files: &BTreeMap<String, Vec<u8>>, path: &str) -> bool {
    let prefix = dir_prefix(path);
    files
        .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
        .next()
        .is_some_and(|(k, _)| k.starts_with(&prefix))
}

#[async_trait]
impl StorageDriver for InMemoryDriver {
    fn name(&self) -> &'static str {
        "inmemory"
    }

    async fn get_content(&self, path: &str) -> Result<Vec<u8>, DriverError> {
        check_path(path)?;
        tracing::trace!(driver = self.name(), path, "get_content");
        let files = self.files.read();
        match files.get(path) {
            Some(content) => Ok(content.clone()),
            None if is_dir(&files, path) => Err(DriverError::NotAFile {
                path: path.to_string(),
            }),
            None => Err(DriverError::PathNotFound {
                path: path.to_string(),
            }),
        }
    }

    async fn put_content(&self, path: &str, content: &[u8]) -> Result<(), DriverError> {
        check_path(path)?;
        tracing::trace!(driver = self.name(), path, len = content.len(), "put_content");
        let mut files = self.files.write();
        if is_dir(&files, path) {
            return Err(DriverError::NotAFile {
                path: path.to_string(),
            });
        }
        let mut ancestor = String::new();
        let parts: Vec<&str> = components(path).collect();
        for part in &parts[..parts.len().saturating_sub(1)] {
            ancestor.push('/');
            ancestor.push_str(part);
            if files.contains_key(&ancestor) {
                return Err(DriverError::NotAFile { path: ancestor });
            }
        }
        files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    async fn list(&self, path: &str) -> Result<Vec<String>, DriverError> {
        check_list_path(path)?;
        tracing::trace!(driver = self.name(), path, "list");
        let files = self.files.read();
        if files.contains_key(path) {
            return Err(DriverError::NotAFile {
                path: path.to_string(),
            });
        }

        let prefix = dir_prefix(path);
        let children: BTreeSet<String> = files
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter_map(|(k, _)| {
                k[prefix.len()..]
                    .split('/')
                    .next()
                    .map(|child| format!("{prefix}{child}"))
            })
            .collect();

        if children.is_empty() && path != "/" {
            return Err(DriverError::PathNotFound {
                path: path.to_string(),
            });
        }
        Ok(children.into_iter().collect())
    }

    async fn delete(&self, path: &str) -> Result<(), DriverError> {
        check_path(path)?;
        tracing::trace!(driver = self.name(), path, "delete");
        let mut files = self.files.write();
        if files.remove(path).is_some() {
            return Ok(());
        }

        let prefix = dir_prefix(path);
        let doomed: Vec<String> = files
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(&prefix))
            .map(|(k, _)| k.clone())
            .collect();
        if doomed.is_empty() {
            return Err(DriverError::PathNotFound {
                path: path.to_string(),
            });
        }
        for key in doomed {
            files.remove(&key);
        }
        Ok(())
    }
}
