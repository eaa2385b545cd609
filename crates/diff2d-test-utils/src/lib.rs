//! Test utilities for diff2d development.
//!
//! Provides in-memory [`SnapshotSink`]s, settings fixtures, scratch
//! output paths, and [`serial_reference`]: an undecomposed solver on one
//! plain array, used as the oracle for decomposed runs.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod reference;

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use diff2d_core::{SnapshotSink, TransportError};

pub use fixtures::{reference_settings, scenario_settings, REFERENCE_PARAMS};
pub use reference::{serial_reference, SerialRun};

/// A growable in-memory file.
///
/// Writes past the end extend it with zero bytes, like a sparse file.
#[derive(Debug, Default)]
pub struct MemorySink {
    bytes: Mutex<Vec<u8>>,
    writes: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current contents.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.lock().unwrap().clone()
    }

    /// Contents decoded as native-endian `f64`s.
    pub fn values(&self) -> Vec<f64> {
        decode_f64s(&self.bytes())
    }

    pub fn len(&self) -> usize {
        self.bytes.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `write_at` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl SnapshotSink for MemorySink {
    fn write_at(&self, byte_offset: u64, data: &[f64]) -> Result<(), TransportError> {
        let start = byte_offset as usize;
        let end = start + data.len() * 8;
        let mut bytes = self.bytes.lock().unwrap();
        if bytes.len() < end {
            bytes.resize(end, 0);
        }
        for (chunk, v) in bytes[start..end].chunks_exact_mut(8).zip(data) {
            chunk.copy_from_slice(&v.to_ne_bytes());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fails deterministically once `ok_writes` writes have succeeded.
#[derive(Debug)]
pub struct FailingSink {
    inner: MemorySink,
    ok_writes: usize,
}

impl FailingSink {
    pub fn new(ok_writes: usize) -> Self {
        Self {
            inner: MemorySink::new(),
            ok_writes,
        }
    }
}

impl SnapshotSink for FailingSink {
    fn write_at(&self, byte_offset: u64, data: &[f64]) -> Result<(), TransportError> {
        if self.inner.write_count() >= self.ok_writes {
            return Err(TransportError::Io {
                offset: byte_offset,
                source: io::Error::other("disk full"),
            });
        }
        self.inner.write_at(byte_offset, data)
    }
}

/// Decode native-endian `f64`s; trailing partial values are dropped.
pub fn decode_f64s(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(8)
        .map(|c| {
            let mut b = [0u8; 8];
            b.copy_from_slice(c);
            f64::from_ne_bytes(b)
        })
        .collect()
}

/// A fresh path in the system temp directory, unique per process and
/// call site name. Any previous file at that path is removed.
pub fn temp_output(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("diff2d-{}-{name}.bin", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_grows_and_overwrites() {
        let s = MemorySink::new();
        s.write_at(16, &[3.0]).unwrap();
        assert_eq!(s.values(), vec![0.0, 0.0, 3.0]);
        s.write_at(0, &[1.0, 2.0]).unwrap();
        assert_eq!(s.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(s.write_count(), 2);
    }

    #[test]
    fn failing_sink_fails_after_budget() {
        let s = FailingSink::new(1);
        assert!(s.write_at(0, &[1.0]).is_ok());
        assert!(matches!(
            s.write_at(8, &[1.0]),
            Err(TransportError::Io { offset: 8, .. })
        ));
    }
}
