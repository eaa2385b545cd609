//! Text dump of a raw snapshot file.
//!
//! A snapshot file is a flat run of native-endian doubles. [`dump`] reads
//! it `columns` values at a time and prints each group as one line of
//! space-separated numbers. A trailing group shorter than `columns` is
//! not printed.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use diff2d_core::ELEMENT_SIZE;

/// Bytes per value in the input.
const ELEMENT_BYTES: usize = ELEMENT_SIZE as usize;

/// Errors from [`dump`] and [`dump_file`].
#[derive(Debug)]
pub enum DumpError {
    /// A row must hold at least one value.
    ZeroColumns,
    /// The input file could not be opened.
    Open {
        /// Path of the file.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Reading the input failed part way.
    Read(io::Error),
    /// Writing the text failed.
    Write(io::Error),
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroColumns => write!(f, "number of columns must be at least 1"),
            Self::Open { path, source } => {
                write!(f, "could not open file '{}': {source}", path.display())
            }
            Self::Read(e) => write!(f, "read failed: {e}"),
            Self::Write(e) => write!(f, "write failed: {e}"),
        }
    }
}

impl Error for DumpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ZeroColumns => None,
            Self::Open { source, .. } => Some(source),
            Self::Read(e) | Self::Write(e) => Some(e),
        }
    }
}

impl DumpError {
    /// Process exit status for this error: 2 when the file cannot be
    /// opened, 3 for a zero column count, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Open { .. } => 2,
            Self::ZeroColumns => 3,
            Self::Read(_) | Self::Write(_) => 1,
        }
    }
}

/// Which rows to print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DumpShape {
    /// Values per printed line.
    pub columns: usize,
    /// Stop after this many lines. `None` (or `Some(0)`) reads to the end.
    pub rows: Option<usize>,
}

impl DumpShape {
    fn row_limit(&self) -> Option<usize> {
        self.rows.filter(|&r| r > 0)
    }
}

/// Fill `buf` completely, or report how many bytes were read before EOF.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Print `reader` as text rows into `out`. Returns the number of rows
/// printed.
pub fn dump<R: Read, W: Write>(
    mut reader: R,
    mut out: W,
    shape: DumpShape,
) -> Result<usize, DumpError> {
    if shape.columns == 0 {
        return Err(DumpError::ZeroColumns);
    }
    let limit = shape.row_limit();
    let mut buf = vec![0u8; shape.columns * ELEMENT_BYTES];
    let mut line = String::new();
    let mut printed = 0;

    while limit.is_none_or(|l| printed < l) {
        let n = read_full(&mut reader, &mut buf).map_err(DumpError::Read)?;
        if n < buf.len() {
            break;
        }
        line.clear();
        for (k, chunk) in buf.chunks_exact(ELEMENT_BYTES).enumerate() {
            let mut bytes = [0u8; ELEMENT_BYTES];
            bytes.copy_from_slice(chunk);
            if k > 0 {
                line.push(' ');
            }
            line.push_str(&f64::from_ne_bytes(bytes).to_string());
        }
        writeln!(out, "{line}").map_err(DumpError::Write)?;
        printed += 1;
    }
    out.flush().map_err(DumpError::Write)?;
    Ok(printed)
}

/// Open `path` and [`dump`] it into `out`.
pub fn dump_file<W: Write>(
    path: impl AsRef<Path>,
    out: W,
    shape: DumpShape,
) -> Result<usize, DumpError> {
    if shape.columns == 0 {
        return Err(DumpError::ZeroColumns);
    }
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DumpError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    dump(BufReader::new(file), BufWriter::new(out), shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }

    fn dump_to_string(values: &[f64], columns: usize, rows: Option<usize>) -> (usize, String) {
        let mut out = Vec::new();
        let n = dump(&encode(values)[..], &mut out, DumpShape { columns, rows }).unwrap();
        (n, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_rows_until_eof() {
        let (n, text) = dump_to_string(&[1.0, 2.5, -3.0, 0.0, 4.0, 5.0], 3, None);
        assert_eq!(n, 2);
        assert_eq!(text, "1 2.5 -3\n0 4 5\n");
    }

    #[test]
    fn row_limit_stops_early() {
        let (n, text) = dump_to_string(&[1.0, 2.0, 3.0, 4.0], 1, Some(2));
        assert_eq!(n, 2);
        assert_eq!(text, "1\n2\n");
    }

    #[test]
    fn zero_rows_means_unlimited() {
        let (n, _) = dump_to_string(&[1.0, 2.0, 3.0, 4.0], 2, Some(0));
        assert_eq!(n, 2);
    }

    #[test]
    fn partial_trailing_row_is_dropped() {
        let (n, text) = dump_to_string(&[1.0, 2.0, 3.0], 2, None);
        assert_eq!(n, 1);
        assert_eq!(text, "1 2\n");
    }

    #[test]
    fn empty_input_prints_nothing() {
        let (n, text) = dump_to_string(&[], 4, None);
        assert_eq!(n, 0);
        assert!(text.is_empty());
    }

    #[test]
    fn zero_columns_is_rejected() {
        let err = dump(&[0u8; 0][..], Vec::new(), DumpShape { columns: 0, rows: None }).unwrap_err();
        assert!(matches!(err, DumpError::ZeroColumns));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = dump_file(
            "/nonexistent-dir/diff2d.bin",
            Vec::new(),
            DumpShape { columns: 1, rows: None },
        )
        .unwrap_err();
        assert!(matches!(err, DumpError::Open { .. }));
        assert!(err.to_string().contains("could not open file"));
    }

    #[test]
    fn exit_codes_per_error() {
        let open = dump_file(
            "/nonexistent-dir/diff2d.bin",
            Vec::new(),
            DumpShape { columns: 1, rows: None },
        )
        .unwrap_err();
        assert_eq!(open.exit_code(), 2);
        assert_eq!(DumpError::ZeroColumns.exit_code(), 3);
        assert_eq!(DumpError::Read(io::Error::other("short read")).exit_code(), 1);
        assert_eq!(DumpError::Write(io::Error::other("broken pipe")).exit_code(), 1);
    }
}
