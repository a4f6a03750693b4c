//! Identifier-to-path mapping.
//!
//! ```text
//! <root>/
//! └── 0f/
//!     └── 8f/
//!         └── ad/
//!             └── 5b/
//!                 ├── doc   # descriptor JSON + '\n'
//!                 ├── 0     # blob slot 0
//!                 └── 1     # blob slot 1
//! ```
//!
//! Four levels of two hex characters spread entities over up to 256^4
//! directories using nothing but the identifier itself.

use std::path::{Path, PathBuf};

use crate::error::{MoundError, Result};

/// Number of leading identifier characters consumed by sharding.
pub const SHARD_PREFIX_LEN: usize = 8;

/// File name of the descriptor inside an entity directory.
pub const DOC_FILE: &str = "doc";

/// Resolves identifiers to locations under a fixed root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `root/d0d1/d2d3/d4d5/d6d7` for identifier `d0d1d2d3d4d5d6d7...`.
    pub fn entity_dir(&self, id: &str) -> Result<PathBuf> {
        let prefix = id
            .get(..SHARD_PREFIX_LEN)
            .filter(|p| p.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| MoundError::InvalidIdentifier(id.to_string()))?;

        let mut dir = self.root.clone();
        for shard in [&prefix[0..2], &prefix[2..4], &prefix[4..6], &prefix[6..8]] {
            dir.push(shard);
        }
        Ok(dir)
    }

    /// Path of the descriptor file.
    pub fn doc_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.entity_dir(id)?.join(DOC_FILE))
    }

    /// Path of the blob file at `slot`.
    pub fn blob_path(&self, id: &str, slot: usize) -> Result<PathBuf> {
        Ok(self.entity_dir(id)?.join(slot.to_string()))
    }

    /// Blob path when `slot` is given, descriptor path otherwise.
    pub fn resolve(&self, id: &str, slot: Option<usize>) -> Result<PathBuf> {
        match slot {
            Some(slot) => self.blob_path(id, slot),
            None => self.doc_path(id),
        }
    }
}
