//! # Path Naming Scheme
//!
//! Maps `(repository, tag, revision)` onto the persisted storage layout.
//! The layout is part of the on-disk contract and must not change between
//! releases:
//!
//! ```text
//! /registry/v2/repositories/<name>/_manifests/
//!     tags/<tag>/current/link                         current-tag link
//!     tag_index/<tag>/<algorithm>/<hex>/link          tag-revision index entry
//! ```
//!
//! The revision index sits outside `tags/<tag>` so that removing a tag
//! directory leaves the tag's history intact.

use regtag_core::{Digest, RepositoryName, ValidationError};

/// Root under which every repository lives.
pub const STORAGE_ROOT: &str = "/registry/v2/repositories";

/// A path to compute. Each variant names one kind of persisted object.
#[derive(Debug, Clone, Copy)]
pub enum PathSpec<'a> {
    /// Directory holding one entry per tag of the repository.
    TagsRoot { name: &'a RepositoryName },
    /// Directory of a single tag.
    Tag {
        name: &'a RepositoryName,
        tag: &'a str,
    },
    /// File holding the digest a tag currently resolves to.
    TagCurrentLink {
        name: &'a RepositoryName,
        tag: &'a str,
    },
    /// Directory holding every revision ever assigned to a tag.
    TagIndex {
        name: &'a RepositoryName,
        tag: &'a str,
    },
    /// Directory of one digest algorithm within a tag's revision index.
    TagIndexAlgorithm {
        name: &'a RepositoryName,
        tag: &'a str,
        algorithm: &'a str,
    },
    /// Marker file recording that `revision` was once assigned to `tag`.
    TagIndexEntryLink {
        name: &'a RepositoryName,
        tag: &'a str,
        revision: &'a Digest,
    },
}

fn manifests_root(name: &RepositoryName) -> String {
    format!("{STORAGE_ROOT}/{name}/_manifests")
}

/// Compute the storage path for `spec`.
///
/// Fails only for `TagIndexEntryLink` with a malformed revision digest.
pub fn path_for(spec: PathSpec<'_>) -> Result<String, ValidationError> {
    let path = match spec {
        PathSpec::TagsRoot { name } => format!("{}/tags", manifests_root(name)),
        PathSpec::Tag { name, tag } => format!("{}/tags/{tag}", manifests_root(name)),
        PathSpec::TagCurrentLink { name, tag } => {
            format!("{}/tags/{tag}/current/link", manifests_root(name))
        }
        PathSpec::TagIndex { name, tag } => {
            format!("{}/tag_index/{tag}", manifests_root(name))
        }
        PathSpec::TagIndexAlgorithm {
            name,
            tag,
            algorithm,
        } => format!("{}/tag_index/{tag}/{algorithm}", manifests_root(name)),
        PathSpec::TagIndexEntryLink {
            name,
            tag,
            revision,
        } => {
            let (algorithm, encoded) = revision.parts()?;
            format!(
                "{}/tag_index/{tag}/{algorithm}/{encoded}/link",
                manifests_root(name)
            )
        }
    };
    Ok(path)
}
