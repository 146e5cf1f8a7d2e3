//! # Error Types — Validation Failures
//!
//! Every value that enters the tag index from a caller (a digest supplied
//! to `Tag`, a repository name, a tag name) is checked before any storage
//! is touched. Failures are reported through [`ValidationError`], which is
//! local and never retried.

use thiserror::Error;

/// A caller-supplied value was malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The digest string was empty.
    #[error("digest is empty")]
    EmptyDigest,

    /// The digest is not of the form `<algorithm>:<encoded>`.
    #[error("invalid digest format: {0:?}")]
    InvalidDigestFormat(String),

    /// The digest names an algorithm this registry does not support.
    #[error("unsupported digest algorithm: {0:?}")]
    UnsupportedAlgorithm(String),

    /// The encoded part has the wrong length for its algorithm.
    #[error("invalid digest length for {algorithm}: expected {expected} hex chars, got {actual}")]
    InvalidDigestLength {
        /// Algorithm named by the digest.
        algorithm: String,
        /// Hex length required by the algorithm.
        expected: usize,
        /// Hex length found.
        actual: usize,
    },

    /// The encoded part contains characters other than lowercase hex.
    #[error("digest encoding must be lowercase hex: {0:?}")]
    InvalidDigestEncoding(String),

    /// The repository name does not match the registry name grammar.
    #[error("invalid repository name {name:?}: {reason}")]
    InvalidRepositoryName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The tag cannot be used as a single storage path component.
    #[error("invalid tag {tag:?}: {reason}")]
    InvalidTag {
        /// The rejected tag.
        tag: String,
        /// Why it was rejected.
        reason: String,
    },
}
