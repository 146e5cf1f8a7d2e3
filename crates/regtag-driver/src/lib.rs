//! # regtag-driver — Path-Addressed Storage Drivers
//!
//! The storage substrate beneath the tag index: get/put/list/delete over
//! byte blobs addressed by `/`-delimited paths, with a typed "path not
//! found" error.
//!
//! - [`StorageDriver`]: the capability trait consumed by the tag store.
//! - [`InMemoryDriver`]: sorted in-memory map, implicit directories.
//! - [`FilesystemDriver`]: local directory tree via `tokio::fs`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `regtag-*` crates; drivers know nothing
//!   about tags or digests.
//! - Every path is syntax-checked before it reaches a backend.

pub mod driver;
pub mod error;
pub mod filesystem;
pub mod inmemory;
pub mod path;

pub use driver::StorageDriver;
pub use error::DriverError;
pub use filesystem::FilesystemDriver;
pub use inmemory::InMemoryDriver;
