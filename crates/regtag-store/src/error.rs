//! # Tag Store Errors
//!
//! A closed set of error kinds so callers can match exhaustively:
//!
//! - `Validation`: malformed input, rejected before any storage mutation.
//! - `RepositoryUnknown`: the repository has no tag directory. `all()`
//!   reports it; `lookup()` treats it as an empty tag set.
//! - `TagUnknown`: the tag has no current link.
//! - `Backend`: any other storage failure. Always propagated.
//!
//! A driver's `PathNotFound` from a read, list, or delete never escapes as
//! `Backend`: the store either translates it into one of the kinds above or
//! absorbs it where absence is benign (untagging a missing tag, a tag
//! vanishing mid-lookup).

use regtag_core::ValidationError;
use regtag_driver::DriverError;
use thiserror::Error;

/// Errors returned by [`TagStore`](crate::TagStore) operations.
#[derive(Error, Debug)]
pub enum TagStoreError {
    /// Caller-supplied input was malformed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No tag has ever been set on the repository.
    #[error("unknown repository name={name}")]
    RepositoryUnknown {
        /// The repository name.
        name: String,
    },

    /// The tag does not currently resolve to a digest.
    #[error("unknown tag={tag}")]
    TagUnknown {
        /// The requested tag.
        tag: String,
    },

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(#[source] DriverError),
}

impl TagStoreError {
    /// Returns `true` for the "repository never tagged" condition.
    pub fn is_repository_unknown(&self) -> bool {
        matches!(self, Self::RepositoryUnknown { .. })
    }
}
