//! Foundation types for mound.
//!
//! Every other mound crate depends on `mound-types`. Nothing in here touches
//! the filesystem.
//!
//! # Key Types
//!
//! - [`Did`] — canonical hyphenated UUID naming one entity
//! - [`DidProvider`] — source of fresh identifiers and the validation predicate for link targets
//! - [`RandomDidProvider`] — UUID v4 provider used by default
//! - [`BlobRef`] — one entry of a descriptor's `blobs` list
//! - [`semver`] — builds the conventional `semver|MAJOR.MINOR.PATCH` version string

pub mod blob_ref;
pub mod did;
pub mod error;
pub mod provider;
pub mod version;

pub use blob_ref::BlobRef;
pub use did::Did;
pub use error::TypeError;
pub use provider::{DidProvider, RandomDidProvider};
pub use version::{parse_semver, semver, SEMVER_PREFIX};
