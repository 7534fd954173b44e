//! `weft-woof`: the escape translator filter — reads a WEFT container on
//! stdin, replaces Woof escape sequences in every content word using a
//! loaded table, and writes the resulting WEFT to stdout (spec 6, "woof
//! translator" `-table`).

use clap::Parser;
use std::fs::File;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use weft_core::error::WeftError;
use weft_core::reader::WeftReader;
use weft_core::woof::WoofTable;
use weft_core::writer::WeftWriter;
use weft_core::WeftResult;

#[derive(Parser)]
#[command(about = "Resolve Woof escape sequences in every content word of a WEFT")]
struct Args {
    /// Woof table file naming the escape lead and its key/value records.
    #[arg(long)]
    table: PathBuf,
}

fn run(args: &Args) -> WeftResult<()> {
    let file = File::open(&args.table)
        .map_err(|_| WeftError::TableMissing(args.table.display().to_string()))?;
    let table = WoofTable::load(file)?;

    let mut reader = WeftReader::new(stdin().lock())?;
    let mut writer = WeftWriter::new()?;
    while let Some(tuple) = reader.read_line()? {
        let mut out = Vec::with_capacity(tuple.len());
        for (i, element) in tuple.into_iter().enumerate() {
            if i % 2 == 1 {
                out.push(table.translate(&element)?);
            } else {
                out.push(element);
            }
        }
        writer.write_line(&out)?;
    }
    writer.close(stdout().lock())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => weft_cli::die(e),
    }
}
