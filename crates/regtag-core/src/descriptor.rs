//! # Descriptor
//!
//! The envelope a caller hands to `Tag`. Only the digest matters to the
//! tag index; `media_type` and `size` ride along for higher layers and are
//! never persisted by the tag store.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::error::ValidationError;

/// A content descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Digest of the described content.
    pub digest: Digest,
    /// Media type of the described content, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Size in bytes of the described content, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Descriptor {
    /// A descriptor carrying only a digest.
    pub fn from_digest(digest: impl Into<Digest>) -> Self {
        Self {
            digest: digest.into(),
            ..Self::default()
        }
    }

    /// Check that the descriptor is usable for tagging.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.digest.validate()
    }
}

impl From<Digest> for Descriptor {
    fn from(digest: Digest) -> Self {
        Self::from_digest(digest)
    }
}
