//! `weft-unpack`: the inverse of a source — reconstitute the original body
//! text from a WEFT container read on stdin, writing it to stdout, and with
//! `--map <path>` also spilling the embedded map to a side file (spec 6,
//! "unpack target" `-map`).

use clap::Parser;
use std::fs::File;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(about = "Reconstitute the original body text from a WEFT container")]
struct Args {
    /// Write the embedded map file to this path in addition to the body.
    #[arg(long)]
    map: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = match args.map {
        Some(path) => match File::create(&path) {
            Ok(mut map_file) => {
                weft_babel::targets::unpack_with_map(stdin().lock(), stdout().lock(), Some(&mut map_file))
            }
            Err(e) => return weft_cli::die(e),
        },
        None => weft_babel::targets::unpack(stdin().lock(), stdout().lock()),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => weft_cli::die(e),
    }
}
