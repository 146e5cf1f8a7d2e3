//! # regtag-store — Tag Index for a Content-Addressed Registry
//!
//! Maps human-readable tags onto immutable content digests held in a
//! path-addressed blob store, and answers the reverse question ("which tags
//! point at digest D?") by a bounded concurrent scan.
//!
//! ## Components
//!
//! - **Path naming** (`paths.rs`): deterministic storage paths for tag
//!   directories, current-tag links, and tag-revision index entries.
//! - **Link store** (`link.rs`): single-digest pointer files.
//! - **Tag store** (`tags.rs`): `all`, `tag`, `get`, `untag`, `revisions`.
//! - **Reverse lookup** (`lookup.rs`): `lookup`, a concurrent scan of every
//!   tag's current link with a fixed admission limit and cancel-on-error.
//!
//! ## Error Model
//!
//! Every operation returns a [`TagStoreError`]. Absence is never a panic:
//! a missing repository, a missing tag, and a tag vanishing mid-scan are
//! all ordinary, matchable outcomes.

pub mod config;
pub mod error;
pub mod link;
pub mod lookup;
pub mod paths;
pub mod tags;

pub use config::{ConfigError, StorageConfig, TagStoreConfig, DEFAULT_LOOKUP_CONCURRENCY};
pub use error::TagStoreError;
pub use link::LinkStore;
pub use paths::{path_for, PathSpec};
pub use tags::TagStore;
