//! Print a binary snapshot file as rows of text.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use diff2d::dump::{dump_file, DumpShape};
use diff2d::logging;
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File of native-endian doubles
    file: PathBuf,
    /// Values per row
    columns: usize,
    /// Rows to print; all rows when omitted or 0
    rows: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(None);

    let shape = DumpShape {
        columns: args.columns,
        rows: args.rows,
    };
    match dump_file(&args.file, io::stdout().lock(), shape) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
