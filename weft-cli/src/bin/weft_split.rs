//! `weft-split`: the word splitter filter — reads a WEFT container on
//! stdin, splits every content word into its linguistic/non-linguistic
//! pieces, and writes the resulting WEFT to stdout (spec 6, "word splitter"
//! — no recognized options, "operate on WEFT").

use clap::Parser;
use std::io::{stdin, stdout};
use std::process::ExitCode;
use weft_core::reader::WeftReader;
use weft_core::word_splitter::split_line;
use weft_core::writer::WeftWriter;

#[derive(Parser)]
#[command(about = "Split every content word of a WEFT into linguistic pieces")]
struct Args;

fn run() -> weft_core::WeftResult<()> {
    let mut reader = WeftReader::new(stdin().lock())?;
    let mut writer = WeftWriter::new()?;
    while let Some(tuple) = reader.read_line()? {
        writer.write_line(&split_line(&tuple))?;
    }
    writer.close(stdout().lock())
}

fn main() -> ExitCode {
    let _args = Args::parse();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => weft_cli::die(e),
    }
}
