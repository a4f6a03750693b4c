use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::trace;

use mound_types::Did;

use crate::error::{MoundError, Result};

/// Append-only handle on one blob file.
///
/// A `Blob` does not own the blob; the entity's descriptor does. The handle
/// is just `(Did, slot)` plus the resolved path, so it can be cloned, moved
/// to another thread, or rebuilt later with
/// [`MoundStore::blob`](crate::MoundStore::blob).
///
/// Every write opens the file in append mode, writes, flushes and closes it.
/// Nothing is buffered between calls and the descriptor is never touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    did: Did,
    slot: usize,
    path: PathBuf,
    durable: bool,
}

impl Blob {
    pub(crate) fn new(did: Did, slot: usize, path: PathBuf, durable: bool) -> Self {
        Self {
            did,
            slot,
            path,
            durable,
        }
    }

    pub fn did(&self) -> &Did {
        &self.did
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append raw bytes.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.append(data.as_ref())
    }

    /// Append bytes followed by `\n`, as a single write.
    pub fn write_line(&self, data: impl AsRef<[u8]>) -> Result<()> {
        let data = data.as_ref();
        let mut line = Vec::with_capacity(data.len() + 1);
        line.extend_from_slice(data);
        line.push(b'\n');
        self.append(&line)
    }

    /// Append formatted text. Lets `write!` and `writeln!` target a handle
    /// directly.
    pub fn write_fmt(&self, args: fmt::Arguments<'_>) -> Result<()> {
        match args.as_str() {
            Some(text) => self.append(text.as_bytes()),
            None => self.append(args.to_string().as_bytes()),
        }
    }

    /// Whole contents of the blob.
    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|source| MoundError::BlobReadFailed {
            path: self.path.clone(),
            source,
        })
    }

    fn append(&self, bytes: &[u8]) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.write_error(source))?;

        let written = file.write_all(bytes);
        let flushed = if self.durable {
            file.sync_data()
        } else {
            file.flush()
        };
        drop(file);
        first_failure(written, flushed).map_err(|source| self.write_error(source))?;

        trace!(did = %self.did, slot = self.slot, len = bytes.len(), "blob append");
        Ok(())
    }

    fn write_error(&self, source: io::Error) -> MoundError {
        MoundError::BlobWriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

/// A write failure outranks a flush failure in the reported error.
fn first_failure(written: io::Result<()>, flushed: io::Result<()>) -> io::Result<()> {
    written.and(flushed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    fn blob_in(dir: &Path, durable: bool) -> Blob {
        Blob::new(Did::parse(ID).unwrap(), 0, dir.join("0"), durable)
    }

    #[test]
    fn write_does_not_add_newline() {
        let dir = tempfile::tempdir().unwrap();
        let blob = blob_in(dir.path(), false);
        blob.write("abc").unwrap();
        blob.write(b"def").unwrap();
        assert_eq!(blob.read().unwrap(), b"abcdef");
    }

    #[test]
    fn write_line_appends_newline() {
        let dir = tempfile::tempdir().unwrap();
        let blob = blob_in(dir.path(), false);
        blob.write_line("Hello, Go!").unwrap();
        blob.write_line("Hello, Go!").unwrap();
        assert_eq!(blob.read().unwrap(), b"Hello, Go!\nHello, Go!\n");
    }

    #[test]
    fn write_line_accepts_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let blob = blob_in(dir.path(), false);
        blob.write_line([0u8, 159, 146, 150]).unwrap();
        assert_eq!(blob.read().unwrap(), vec![0, 159, 146, 150, b'\n']);
    }

    #[test]
    fn write_macros() {
        let dir = tempfile::tempdir().unwrap();
        let blob = blob_in(dir.path(), false);
        write!(blob, "{}-{:03}", "run", 7).unwrap();
        writeln!(blob, " ok").unwrap();
        writeln!(blob, "plain").unwrap();
        assert_eq!(blob.read().unwrap(), b"run-007 ok\nplain\n");
    }

    #[test]
    fn durable_writes() {
        let dir = tempfile::tempdir().unwrap();
        let blob = blob_in(dir.path(), true);
        blob.write_line("synced").unwrap();
        assert_eq!(blob.read().unwrap(), b"synced\n");
    }

    #[test]
    fn write_recreates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let blob = blob_in(dir.path(), false);
        assert!(!blob.path().exists());
        blob.write("x").unwrap();
        assert!(blob.path().exists());
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blob = blob_in(&dir.path().join("absent"), false);
        let err = blob.write("x").unwrap_err();
        assert!(matches!(err, MoundError::BlobWriteFailed { .. }));
    }

    #[test]
    fn read_missing_blob_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blob = blob_in(dir.path(), false);
        assert!(matches!(
            blob.read().unwrap_err(),
            MoundError::BlobReadFailed { .. }
        ));
    }

    #[test]
    fn handles_to_same_slot_share_contents() {
        let dir = tempfile::tempdir().unwrap();
        let a = blob_in(dir.path(), false);
        let b = a.clone();
        a.write("1").unwrap();
        b.write("2").unwrap();
        assert_eq!(a.read().unwrap(), b"12");
        assert_eq!(a, b);
    }

    #[test]
    fn write_error_outranks_flush_error() {
        let write = || io::Error::new(io::ErrorKind::WriteZero, "short write");
        let flush = || io::Error::new(io::ErrorKind::Other, "flush");

        let err = first_failure(Err(write()), Err(flush())).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
        let err = first_failure(Ok(()), Err(flush())).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(first_failure(Ok(()), Ok(())).is_ok());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_device_reports_write_error() {
        const ENOSPC: i32 = 28;
        for durable in [false, true] {
            let blob = Blob::new(Did::parse(ID).unwrap(), 0, "/dev/full".into(), durable);
            match blob.write("x") {
                Err(MoundError::BlobWriteFailed { path, source }) => {
                    assert_eq!(path, Path::new("/dev/full"));
                    assert_eq!(source.raw_os_error(), Some(ENOSPC));
                }
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }
}
