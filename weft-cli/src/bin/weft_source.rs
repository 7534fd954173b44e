//! `weft-source`: package plain text from stdin as a WEFT container on
//! stdout (spec 6, "plain-text source" — no recognized options).

use clap::Parser;
use std::io::{stdin, stdout};
use std::process::ExitCode;

#[derive(Parser)]
#[command(about = "Package stdin as a WEFT container (plain-text source)")]
struct Args;

fn main() -> ExitCode {
    let _args = Args::parse();
    match weft_babel::plain_text::source(stdin().lock(), stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => weft_cli::die(e),
    }
}
