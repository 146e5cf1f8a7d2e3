//! # Tag Store
//!
//! Mutable tags layered over write-once, content-addressed storage. A tag
//! is a current-tag link naming one digest; every digest ever assigned to
//! a tag is also recorded in the tag's revision index.
//!
//! ## Write Ordering
//!
//! `tag()` writes the revision index entry first and the current link
//! second. A current link therefore always names a digest with an index
//! entry. A failure between the two writes leaves an extra index entry and
//! the old pointer, and a retry repairs the pointer.
//!
//! ## Concurrency
//!
//! No client-side locking. Concurrent `tag`/`untag`/`lookup` calls against
//! the same tag race on which write wins, never on data integrity.

use std::sync::Arc;

use regtag_core::{validate_tag, Descriptor, Digest, RepositoryName};
use regtag_driver::{DriverError, StorageDriver};

use crate::config::TagStoreConfig;
use crate::error::TagStoreError;
use crate::link::LinkStore;
use crate::paths::{path_for, PathSpec};

/// Tag operations for a single repository.
#[derive(Debug, Clone)]
pub struct TagStore {
    pub(crate) repository: RepositoryName,
    pub(crate) links: LinkStore,
    pub(crate) config: TagStoreConfig,
}

/// Final component of a driver path.
pub(crate) fn last_component(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

impl TagStore {
    /// Create a tag store for `repository` over `driver`.
    pub fn new(
        repository: RepositoryName,
        driver: Arc<dyn StorageDriver>,
        config: TagStoreConfig,
    ) -> Self {
        Self {
            repository,
            links: LinkStore::new(driver),
            config,
        }
    }

    /// Create a tag store whose driver is built from `config.storage`.
    pub fn from_config(repository: RepositoryName, config: TagStoreConfig) -> Self {
        let driver = config.storage.build_driver();
        Self::new(repository, driver, config)
    }

    /// The repository this store manages.
    pub fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// The configuration in effect.
    pub fn config(&self) -> &TagStoreConfig {
        &self.config
    }

    /// List every tag of the repository, in driver listing order.
    ///
    /// A repository that was never tagged has no tag directory and yields
    /// [`TagStoreError::RepositoryUnknown`] rather than an empty list.
    pub async fn all(&self) -> Result<Vec<String>, TagStoreError> {
        let tags_root = path_for(PathSpec::TagsRoot {
            name: &self.repository,
        })?;

        let entries = self
            .links
            .driver()
            .list(&tags_root)
            .await
            .map_err(|e| match e {
                DriverError::PathNotFound { .. } => TagStoreError::RepositoryUnknown {
                    name: self.repository.to_string(),
                },
                other => TagStoreError::Backend(other),
            })?;

        Ok(entries
            .iter()
            .map(|entry| last_component(entry).to_string())
            .collect())
    }

    /// Point `tag` at `desc.digest`.
    ///
    /// The descriptor is validated before any write. The revision index
    /// entry is written before the current link.
    pub async fn tag(&self, tag: &str, desc: &Descriptor) -> Result<(), TagStoreError> {
        validate_tag(tag)?;
        desc.validate()?;

        let index_path = path_for(PathSpec::TagIndexEntryLink {
            name: &self.repository,
            tag,
            revision: &desc.digest,
        })?;
        let current_path = path_for(PathSpec::TagCurrentLink {
            name: &self.repository,
            tag,
        })?;

        self.links
            .write_link(&index_path, &desc.digest)
            .await
            .map_err(TagStoreError::Backend)?;
        self.links
            .write_link(&current_path, &desc.digest)
            .await
            .map_err(TagStoreError::Backend)?;

        tracing::debug!(
            repository = %self.repository,
            tag,
            digest = %desc.digest,
            "tagged"
        );
        Ok(())
    }

    /// Resolve `tag` to the descriptor of its current digest.
    pub async fn get(&self, tag: &str) -> Result<Descriptor, TagStoreError> {
        validate_tag(tag)?;
        let current_path = path_for(PathSpec::TagCurrentLink {
            name: &self.repository,
            tag,
        })?;

        match self.links.read_link(&current_path).await {
            Ok(digest) => Ok(Descriptor::from_digest(digest)),
            Err(DriverError::PathNotFound { .. }) => Err(TagStoreError::TagUnknown {
                tag: tag.to_string(),
            }),
            Err(e) => Err(TagStoreError::Backend(e)),
        }
    }

    /// Remove `tag`. Untagging a tag that does not exist succeeds.
    ///
    /// The tag's revision index is left in place.
    pub async fn untag(&self, tag: &str) -> Result<(), TagStoreError> {
        validate_tag(tag)?;
        let tag_path = path_for(PathSpec::Tag {
            name: &self.repository,
            tag,
        })?;

        match self.links.driver().delete(&tag_path).await {
            Ok(()) => {
                tracing::debug!(repository = %self.repository, tag, "untagged");
                Ok(())
            }
            Err(DriverError::PathNotFound { .. }) => {
                tracing::debug!(repository = %self.repository, tag, "untag of missing tag");
                Ok(())
            }
            Err(e) => Err(TagStoreError::Backend(e)),
        }
    }

    /// List every digest ever assigned to `tag`, including ones it no
    /// longer points at. Survives `untag`.
    ///
    /// Returns [`TagStoreError::TagUnknown`] if the tag has no history.
    pub async fn revisions(&self, tag: &str) -> Result<Vec<Digest>, TagStoreError> {
        validate_tag(tag)?;
        let index_root = path_for(PathSpec::TagIndex {
            name: &self.repository,
            tag,
        })?;
        let not_found_as_unknown = |e: DriverError| match e {
            DriverError::PathNotFound { .. } => TagStoreError::TagUnknown {
                tag: tag.to_string(),
            },
            other => TagStoreError::Backend(other),
        };

        let algorithms = self
            .links
            .driver()
            .list(&index_root)
            .await
            .map_err(not_found_as_unknown)?;

        let mut revisions = Vec::new();
        for algorithm_dir in &algorithms {
            let algorithm = last_component(algorithm_dir);
            let algorithm_path = path_for(PathSpec::TagIndexAlgorithm {
                name: &self.repository,
                tag,
                algorithm,
            })?;
            let entries = match self.links.driver().list(&algorithm_path).await {
                Ok(entries) => entries,
                // Raced with a concurrent removal of the index.
                Err(DriverError::PathNotFound { .. }) => continue,
                Err(e) => return Err(TagStoreError::Backend(e)),
            };
            revisions.extend(
                entries
                    .iter()
                    .map(|entry| Digest::new(format!("{algorithm}:{}", last_component(entry)))),
            );
        }

        if revisions.is_empty() {
            return Err(TagStoreError::TagUnknown {
                tag: tag.to_string(),
            });
        }
        Ok(revisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regtag_driver::InMemoryDriver;

    fn store() -> (TagStore, Arc<InMemoryDriver>) {
        let driver = Arc::new(InMemoryDriver::new());
        let store = TagStore::new(
            RepositoryName::new("a/b").unwrap(),
            driver.clone(),
            TagStoreConfig::default(),
        );
        (store, driver)
    }

    #[tokio::test]
    async fn test_tag_writes_index_entry_and_current_link() {
        let (store, driver) = store();
        let d = Digest::sha256_of(b"manifest");
        store.tag("latest", &Descriptor::from_digest(d.clone())).await.unwrap();

        let (_, hex) = d.parts().unwrap();
        let index = format!(
            "/registry/v2/repositories/a/b/_manifests/tag_index/latest/sha256/{hex}/link"
        );
        let current = "/registry/v2/repositories/a/b/_manifests/tags/latest/current/link";
        assert_eq!(driver.get_content(&index).await.unwrap(), d.as_str().as_bytes());
        assert_eq!(driver.get_content(current).await.unwrap(), d.as_str().as_bytes());
    }

    #[tokio::test]
    async fn test_malformed_descriptor_writes_nothing() {
        let (store, driver) = store();
        for digest in ["", "sha256:abc", "nothing"] {
            let err = store
                .tag("latest", &Descriptor::from_digest(digest))
                .await
                .unwrap_err();
            assert!(matches!(err, TagStoreError::Validation(_)), "{digest:?}");
        }
        assert_eq!(driver.file_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_tag_rejected_everywhere() {
        let (store, driver) = store();
        let desc = Descriptor::from_digest(Digest::sha256_of(b"m"));
        assert!(matches!(
            store.tag("a/b", &desc).await,
            Err(TagStoreError::Validation(_))
        ));
        assert!(matches!(store.get("..").await, Err(TagStoreError::Validation(_))));
        assert!(matches!(store.untag("").await, Err(TagStoreError::Validation(_))));
        assert_eq!(driver.file_count(), 0);
    }

    #[tokio::test]
    async fn test_all_on_untagged_repository_is_repository_unknown() {
        let (store, _) = store();
        let err = store.all().await.unwrap_err();
        assert!(err.is_repository_unknown());
        assert_eq!(err.to_string(), "unknown repository name=a/b");
    }

    #[tokio::test]
    async fn test_get_missing_tag_is_tag_unknown() {
        let (store, _) = store();
        let err = store.get("latest").await.unwrap_err();
        assert_eq!(err.to_string(), "unknown tag=latest");
    }

    #[tokio::test]
    async fn test_get_returns_digest_only() {
        let (store, _) = store();
        let desc = Descriptor {
            digest: Digest::sha256_of(b"m"),
            media_type: Some("application/vnd.oci.image.manifest.v1+json".into()),
            size: Some(1),
        };
        store.tag("latest", &desc).await.unwrap();
        let got = store.get("latest").await.unwrap();
        assert_eq!(got, Descriptor::from_digest(desc.digest));
    }

    #[tokio::test]
    async fn test_untag_keeps_revision_index() {
        let (store, _) = store();
        let d1 = Digest::sha256_of(b"one");
        let d2 = Digest::sha256_of(b"two");
        store.tag("latest", &d1.clone().into()).await.unwrap();
        store.tag("latest", &d2.clone().into()).await.unwrap();
        store.tag("latest", &d2.clone().into()).await.unwrap();
        store.untag("latest").await.unwrap();

        let mut revisions = store.revisions("latest").await.unwrap();
        revisions.sort();
        let mut expected = vec![d1, d2];
        expected.sort();
        assert_eq!(revisions, expected);
        assert!(matches!(
            store.get("latest").await,
            Err(TagStoreError::TagUnknown { .. })
        ));
    }

    #[tokio::test]
    async fn test_revisions_of_unknown_tag() {
        let (store, _) = store();
        assert!(matches!(
            store.revisions("never").await,
            Err(TagStoreError::TagUnknown { tag }) if tag == "never"
        ));
    }

    #[test]
    fn test_last_component() {
        assert_eq!(last_component("/a/b/c"), "c");
        assert_eq!(last_component("c"), "c");
    }
}
