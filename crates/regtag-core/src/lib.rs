//! # regtag-core — Foundational Types for the Tag Index
//!
//! Leaf crate of the workspace. Defines the value types that flow through
//! the tag store and its storage driver:
//!
//! - [`Digest`]: opaque content identifier, validated only on entry.
//! - [`Descriptor`]: envelope carrying a digest plus inert metadata.
//! - [`RepositoryName`]: validated root of every persisted path.
//! - [`ValidationError`]: the single error kind this crate produces.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `regtag-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod descriptor;
pub mod digest;
pub mod error;
pub mod identity;

pub use descriptor::Descriptor;
pub use digest::{Digest, DigestAlgorithm};
pub use error::ValidationError;
pub use identity::{validate_tag, RepositoryName, MAX_REPOSITORY_NAME_LEN, MAX_TAG_LEN};
