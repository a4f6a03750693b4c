use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use mound_types::{Did, DidProvider, RandomDidProvider};

use crate::blob::Blob;
use crate::config::MoundConfig;
use crate::descriptor::Descriptor;
use crate::error::{MoundError, Result};
use crate::layout::{Layout, DOC_FILE};
use crate::mound::Mound;

/// Descriptor store rooted at one directory.
///
/// Creates entities, resumes them from disk, and is the only code path that
/// writes `doc` files. Cloning is cheap; clones share the identifier provider.
#[derive(Clone)]
pub struct MoundStore {
    layout: Layout,
    durable: bool,
    provider: Arc<dyn DidProvider>,
}

impl MoundStore {
    /// Store using random UUID v4 identifiers.
    pub fn new(config: MoundConfig) -> Self {
        Self::with_provider(config, Arc::new(RandomDidProvider::new()))
    }

    /// Store using a caller-supplied identifier provider.
    pub fn with_provider(config: MoundConfig, provider: Arc<dyn DidProvider>) -> Self {
        Self {
            layout: Layout::new(config.root),
            durable: config.durable,
            provider,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn provider(&self) -> &dyn DidProvider {
        self.provider.as_ref()
    }

    pub fn is_durable(&self) -> bool {
        self.durable
    }

    /// Allocate an identifier and persist an open descriptor for it.
    pub fn create(&self, program: &str, version: &str) -> Result<Mound> {
        require_non_empty("program", program)?;
        require_non_empty("version", version)?;

        let did = self
            .provider
            .generate()
            .map_err(MoundError::IdentifierGenerationFailed)?;
        let doc = Descriptor::new(did, program, version);
        self.persist(&doc)?;

        debug!(did = %doc.did, program, version, "entity created");
        Ok(Mound::from_parts(self.clone(), doc))
    }

    /// Resume an entity persisted earlier, possibly by another process.
    pub fn open(&self, did: &Did) -> Result<Mound> {
        let doc = self.load(did)?;
        Ok(Mound::from_parts(self.clone(), doc))
    }

    /// Write `doc` as the complete contents of its `doc` file.
    ///
    /// Creates the shard directories as needed. Persisting an unchanged
    /// descriptor produces byte-identical output.
    pub fn persist(&self, doc: &Descriptor) -> Result<()> {
        let dir = self.layout.entity_dir(doc.did.as_str())?;
        fs::create_dir_all(&dir).map_err(|source| MoundError::PersistenceFailed {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(DOC_FILE);
        let data = doc.to_json_line()?;
        write_whole(&path, &data, self.durable)
            .map_err(|source| MoundError::PersistenceFailed { path, source })?;

        debug!(
            did = %doc.did,
            status = doc.status,
            blobs = doc.blobs.len(),
            links = doc.links.len(),
            "document persisted"
        );
        Ok(())
    }

    /// Read and parse the descriptor for `did`.
    pub fn load(&self, did: &Did) -> Result<Descriptor> {
        let path = self.layout.doc_path(did.as_str())?;
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(MoundError::DocumentNotFound(did.clone()))
            }
            Err(source) => return Err(MoundError::PersistenceFailed { path, source }),
        };
        let doc = Descriptor::from_json(&data).map_err(|source| MoundError::CorruptDocument {
            path: path.clone(),
            source,
        })?;

        // Identifiers sharing a shard prefix resolve to the same `doc`.
        if doc.did != *did {
            return Err(MoundError::DocumentMismatch {
                requested: did.clone(),
                found: doc.did,
                path,
            });
        }
        Ok(doc)
    }

    /// Returns `true` if a descriptor for `did` itself is on disk.
    pub fn exists(&self, did: &Did) -> Result<bool> {
        match self.load(did) {
            Ok(_) => Ok(true),
            Err(MoundError::DocumentNotFound(_) | MoundError::DocumentMismatch { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Rebuild a handle from `(did, slot)` without consulting the descriptor.
    pub fn blob(&self, did: &Did, slot: usize) -> Result<Blob> {
        let path = self.layout.blob_path(did.as_str(), slot)?;
        Ok(Blob::new(did.clone(), slot, path, self.durable))
    }
}

impl fmt::Debug for MoundStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoundStore")
            .field("root", &self.layout.root())
            .field("durable", &self.durable)
            .finish()
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(MoundError::InvalidField {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

/// Replace the contents of `path` in one write.
pub(crate) fn write_whole(path: &Path, data: &[u8], durable: bool) -> io::Result<()> {
    if !durable {
        return fs::write(path, data);
    }
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_data()
}
