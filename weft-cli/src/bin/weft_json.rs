//! `weft-json`: emit the JSON diagnostic of a WEFT container's parsed lines
//! (spec 4.L) — a single JSON document, an outer array of inner arrays, each
//! holding one body line's tuple strings.
//!
//! `--map` and `--pretty` are the supplemented affordances SPEC_FULL.md adds
//! for this target: `--map` appends each line's raw records as a trailing
//! array element, `--pretty` switches from the compact default to indented
//! output (width from config, overridable with `--indent`).

use clap::Parser;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(about = "Emit a JSON diagnostic of a WEFT container's parsed lines")]
struct Args {
    /// Also include each line's raw map records.
    #[arg(long)]
    map: bool,

    /// Pretty-print with indentation instead of one compact object per line.
    #[arg(long)]
    pretty: bool,

    /// Indentation width used when `--pretty` is set.
    #[arg(long)]
    indent: Option<usize>,

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

    let pretty = args.pretty || config.json.pretty;
    let indent = if pretty {
        Some(args.indent.unwrap_or(config.json.indent_width))
    } else {
        None
    };

    match weft_babel::targets::json(stdin().lock(), stdout().lock(), args.map, indent) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => weft_cli::die(e),
    }
}
