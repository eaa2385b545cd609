//! The shared snapshot file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use diff2d_core::{SnapshotSink, TransportError};

/// Output file shared by every rank of a group.
///
/// Created (and truncated) once; clones share the same handle. Writes
/// are positioned, so ranks writing disjoint byte ranges never need to
/// coordinate and no file cursor is shared.
#[derive(Clone, Debug)]
pub struct SharedFile {
    file: Arc<File>,
    path: PathBuf,
}

impl SharedFile {
    /// Create `path`, truncating any previous contents.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            file: Arc::new(file),
            path,
        })
    }

    /// Path the file was created at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current length of the file in bytes.
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(unix)]
fn write_all_at(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.write_all_at(buf, offset)
}

#[cfg(windows)]
fn write_all_at(file: &File, mut buf: &[u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_write(buf, offset) {
            Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero)),
            Ok(n) => {
                buf = &buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

impl SnapshotSink for SharedFile {
    fn write_at(&self, byte_offset: u64, data: &[f64]) -> Result<(), TransportError> {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_ne_bytes()).collect();
        write_all_at(&self.file, &bytes, byte_offset).map_err(|source| TransportError::Io {
            offset: byte_offset,
            source,
        })
    }

    fn flush(&self) -> Result<(), TransportError> {
        self.file.sync_data().map_err(|source| TransportError::Io {
            offset: 0,
            source,
        })
    }
}
