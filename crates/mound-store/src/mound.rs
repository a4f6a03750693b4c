use std::fs::File;
use std::path::PathBuf;

use tracing::debug;

use mound_types::{BlobRef, Did};

use crate::blob::Blob;
use crate::descriptor::{Descriptor, OPEN_STATUS};
use crate::error::{MoundError, Result};
use crate::store::MoundStore;

/// Handle on one entity: its descriptor plus the store it lives in.
///
/// Every mutation (blob allocation, link, close) updates the in-memory
/// descriptor and then persists the whole document. A failed persist is not
/// rolled back; the in-memory descriptor keeps the change.
///
/// Lifecycle: `Open` (status `-1`) until [`close`](Self::close). Blob
/// allocation and linking are refused once closed. Closing again overwrites
/// the status.
#[derive(Debug)]
pub struct Mound {
    store: MoundStore,
    doc: Descriptor,
}

impl Mound {
    pub(crate) fn from_parts(store: MoundStore, doc: Descriptor) -> Self {
        Self { store, doc }
    }

    pub fn did(&self) -> &Did {
        &self.doc.did
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.doc
    }

    pub fn store(&self) -> &MoundStore {
        &self.store
    }

    pub fn status(&self) -> i32 {
        self.doc.status
    }

    pub fn is_open(&self) -> bool {
        self.doc.is_open()
    }

    pub fn blobs(&self) -> &[BlobRef] {
        &self.doc.blobs
    }

    pub fn links(&self) -> &[Did] {
        &self.doc.links
    }

    /// Directory holding the descriptor and every blob of this entity.
    pub fn dir(&self) -> Result<PathBuf> {
        self.store.layout().entity_dir(self.did().as_str())
    }

    /// Allocate an anonymous blob.
    pub fn blob(&mut self) -> Result<Blob> {
        self.allocate_blob(&[])
    }

    /// Allocate a named blob. The name is recorded in the descriptor; the
    /// file is still named by slot.
    pub fn named_blob(&mut self, name: &str) -> Result<Blob> {
        self.allocate_blob(&[name])
    }

    /// Allocate the next blob slot, optionally named.
    ///
    /// At most one name may be given. The empty blob file is created before
    /// the descriptor is updated and persisted.
    pub fn allocate_blob(&mut self, names: &[&str]) -> Result<Blob> {
        if names.len() > 1 {
            return Err(MoundError::TooManyArguments { given: names.len() });
        }
        self.ensure_open()?;
        let name = names.first().copied();
        if let Some(name) = name {
            if name.is_empty() {
                return Err(MoundError::InvalidBlobName(name.to_string()));
            }
        }

        let slot = self.doc.next_slot();
        let blob = self.store.blob(self.did(), slot)?;
        File::create(blob.path()).map_err(|source| MoundError::PersistenceFailed {
            path: blob.path().to_path_buf(),
            source,
        })?;

        let entry = match name {
            Some(name) => BlobRef::Named {
                name: name.to_string(),
                slot,
            },
            None => BlobRef::Indexed(slot),
        };
        self.doc.blobs.push(entry);
        self.store.persist(&self.doc)?;

        debug!(did = %self.doc.did, slot, name = ?name, "blob allocated");
        Ok(blob)
    }

    /// Handle for an already-allocated slot.
    pub fn blob_handle(&self, slot: usize) -> Result<Blob> {
        if slot >= self.doc.blobs.len() {
            return Err(MoundError::UnknownBlob {
                did: self.did().clone(),
                slot,
            });
        }
        self.store.blob(self.did(), slot)
    }

    /// Slot of the first blob allocated under `name`.
    pub fn blob_slot(&self, name: &str) -> Option<usize> {
        self.doc
            .blobs
            .iter()
            .find(|entry| entry.name() == Some(name))
            .map(BlobRef::slot)
    }

    /// Record a weak reference to another entity.
    ///
    /// The target is checked by the store's identifier provider only; it need
    /// not exist. Returns `false` if the link was already present (the
    /// document is persisted either way).
    pub fn link(&mut self, target: &str) -> Result<bool> {
        self.ensure_open()?;
        if !self.store.provider().validate(target) {
            return Err(MoundError::InvalidLinkTarget(target.to_string()));
        }
        let target =
            Did::parse(target).map_err(|_| MoundError::InvalidLinkTarget(target.to_string()))?;

        let added = !self.doc.links.contains(&target);
        if added {
            self.doc.links.push(target.clone());
        }
        self.store.persist(&self.doc)?;

        debug!(did = %self.doc.did, link = %target, added, "link recorded");
        Ok(added)
    }

    /// Set the terminal status and persist.
    pub fn close(&mut self, status: i32) -> Result<()> {
        if status == OPEN_STATUS {
            return Err(MoundError::InvalidStatus(status));
        }
        self.doc.status = status;
        self.store.persist(&self.doc)?;

        debug!(did = %self.doc.did, status, "entity closed");
        Ok(())
    }

    /// Write the current descriptor again.
    pub fn persist(&self) -> Result<()> {
        self.store.persist(&self.doc)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.doc.is_open() {
            Ok(())
        } else {
            Err(MoundError::AlreadyClosed(self.did().clone()))
        }
    }
}
