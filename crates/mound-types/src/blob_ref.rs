//! Entries of a descriptor's `blobs` list.
//!
//! On disk each entry is either a JSON integer (an anonymous blob, whose value
//! is its own slot) or a JSON string (a named blob). A named entry does not
//! record its slot; the slot is its position in the list. [`deserialize_list`]
//! restores that position when a document is read back.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// One entry of the `blobs` list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlobRef {
    /// Anonymous blob, referenced by slot number alone.
    Indexed(usize),
    /// Named blob; `slot` is still the storage file name.
    Named { name: String, slot: usize },
}

impl BlobRef {
    /// The slot number, i.e. the blob's file name under the entity directory.
    pub fn slot(&self) -> usize {
        match self {
            Self::Indexed(slot) => *slot,
            Self::Named { slot, .. } => *slot,
        }
    }

    /// The human-readable name, if one was given at allocation.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Indexed(_) => None,
            Self::Named { name, .. } => Some(name),
        }
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed(slot) => write!(f, "#{slot}"),
            Self::Named { name, slot } => write!(f, "#{slot} ({name})"),
        }
    }
}

impl Serialize for BlobRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Indexed(slot) => serializer.serialize_u64(*slot as u64),
            Self::Named { name, .. } => serializer.serialize_str(name),
        }
    }
}

/// Raw on-disk shape of one entry, before its position is known.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Slot(u64),
    Name(String),
}

/// Deserialize a whole `blobs` list, assigning slots by position.
///
/// An integer entry must equal its own position; anything else means the
/// slot sequence is not dense and the document is rejected.
pub fn deserialize_list<'de, D>(deserializer: D) -> Result<Vec<BlobRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawEntry>::deserialize(deserializer)?;
    raw.into_iter()
        .enumerate()
        .map(|(position, entry)| match entry {
            RawEntry::Slot(slot) if slot == position as u64 => Ok(BlobRef::Indexed(position)),
            RawEntry::Slot(slot) => Err(de::Error::custom(format!(
                "blob slot {slot} recorded at position {position}"
            ))),
            RawEntry::Name(name) => Ok(BlobRef::Named {
                name,
                slot: position,
            }),
        })
        .collect()
}
