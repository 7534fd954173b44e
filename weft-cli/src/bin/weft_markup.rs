//! `weft-markup`: package markup (XML/HTML-ish) text from stdin as a WEFT
//! container on stdout, starting the tokenizer in a given state (spec 6,
//! "markup source" `-begin`).
//!
//! Spec 6 writes its flags single-dash (`-begin state`); this CLI layer
//! maps that onto clap's conventional `--begin <state>` long-flag form, the
//! one deliberate surface adaptation `weft-cli` makes to the tools listed in
//! spec.md's external-interfaces table.

use clap::Parser;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;
use weft_babel::Location;

#[derive(Parser)]
#[command(about = "Package stdin as a WEFT container (markup source)")]
struct Args {
    /// Initial tokenizer state (one of the 11 location names; default from configuration).
    #[arg(long)]
    begin: Option<String>,

    /// Layer a TOML file over the embedded configuration defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = match weft_cli::load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => return weft_cli::die(e),
    };
    let begin_name = args.begin.as_deref().unwrap_or(&config.markup.default_begin_state);
    let begin = match Location::parse(begin_name) {
        Ok(loc) => loc,
        Err(e) => return weft_cli::die(e),
    };
    match weft_babel::markup::source(stdin().lock(), stdout().lock(), begin) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => weft_cli::die(e),
    }
}
