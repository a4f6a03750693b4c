use serde::{Deserialize, Serialize};

use mound_types::{BlobRef, Did};

use crate::error::Result;

/// `status` of an entity that has not been closed.
pub const OPEN_STATUS: i32 = -1;

/// The JSON metadata record for one entity.
///
/// Field order here is the key order on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub did: Did,
    pub program: String,
    pub version: String,
    pub status: i32,
    #[serde(deserialize_with = "mound_types::blob_ref::deserialize_list")]
    pub blobs: Vec<BlobRef>,
    pub links: Vec<Did>,
}

impl Descriptor {
    /// A fresh, open descriptor with no blobs and no links.
    pub fn new(did: Did, program: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            did,
            program: program.into(),
            version: version.into(),
            status: OPEN_STATUS,
            blobs: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == OPEN_STATUS
    }

    /// Slot the next allocated blob will receive.
    pub fn next_slot(&self) -> usize {
        self.blobs.len()
    }

    /// Compact JSON followed by a single `\n`; the exact bytes of a `doc` file.
    pub fn to_json_line(&self) -> Result<Vec<u8>> {
        let mut data = serde_json::to_vec(self)?;
        data.push(b'\n');
        Ok(data)
    }

    /// Parse the contents of a `doc` file.
    pub fn from_json(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }
}
