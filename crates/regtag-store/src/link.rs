//! # Link Store
//!
//! A link is a small file holding exactly one digest, used as a pointer.
//! Reads return the stored digest unmodified; writes overwrite without any
//! concurrency check, so the last writer wins.

use std::sync::Arc;

use regtag_core::Digest;
use regtag_driver::{DriverError, StorageDriver};

/// Reads and writes single-digest link files over a storage driver.
#[derive(Clone)]
pub struct LinkStore {
    driver: Arc<dyn StorageDriver>,
}

impl LinkStore {
    /// Create a link store over `driver`.
    pub fn new(driver: Arc<dyn StorageDriver>) -> Self {
        Self { driver }
    }

    /// The underlying driver.
    pub fn driver(&self) -> &Arc<dyn StorageDriver> {
        &self.driver
    }

    /// Read the digest stored at `path`.
    ///
    /// Returns `PathNotFound` when no link exists. The digest is not
    /// validated; it is returned exactly as written.
    pub async fn read_link(&self, path: &str) -> Result<Digest, DriverError> {
        let content = self.driver.get_content(path).await?;
        let digest = String::from_utf8(content).map_err(|e| DriverError::InvalidContent {
            path: path.to_string(),
            reason: format!("link is not UTF-8: {e}"),
        })?;
        Ok(Digest::new(digest))
    }

    /// Point the link at `path` to `digest`, replacing any previous value.
    pub async fn write_link(&self, path: &str, digest: &Digest) -> Result<(), DriverError> {
        self.driver.put_content(path, digest.as_str().as_bytes()).await
    }
}

impl std::fmt::Debug for LinkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkStore")
            .field("driver", &self.driver.name())
            .finish()
    }
}
