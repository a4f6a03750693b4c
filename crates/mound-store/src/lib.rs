//! Sharded on-disk store for mound entities.
//!
//! Every entity gets a random identifier, a JSON descriptor (`doc`) and any
//! number of append-only blobs, all kept in one directory whose path is
//! derived from the identifier:
//!
//! ```text
//! <root>/0f/8f/ad/5b/doc
//! <root>/0f/8f/ad/5b/0
//! <root>/0f/8f/ad/5b/1
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use mound_store::{MoundConfig, MoundStore};
//!
//! # fn main() -> mound_store::Result<()> {
//! let store = MoundStore::new(MoundConfig::with_root("/var/lib/mound"));
//! let mut mound = store.create("my-tool", &mound_types::semver(1, 0, 0))?;
//! let log = mound.named_blob("log")?;
//! writeln!(log, "started")?;
//! mound.close(0)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Rules
//!
//! 1. The descriptor on disk is always a full serialization of the latest state.
//! 2. Blob slots are dense from 0 and never reused; the slot is the file name.
//! 3. Blob writes never touch the descriptor.
//! 4. One writer per entity. Nothing is locked; concurrent writers race.
//! 5. Errors are returned, never logged or retried here.

pub mod blob;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod mound;
pub mod store;

pub use blob::Blob;
pub use config::MoundConfig;
pub use descriptor::{Descriptor, OPEN_STATUS};
pub use error::{MoundError, Result};
pub use layout::Layout;
pub use mound::Mound;
pub use store::MoundStore;
