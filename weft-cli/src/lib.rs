//! Shared plumbing for the seven WEFT pipeline binaries: each is a thin
//! `clap::Parser` wrapper around one `weft-core`/`weft-babel` operation over
//! stdin/stdout, so the only thing worth factoring out is the config load
//! and the fatal-error-to-stderr idiom every one of them ends with.

use std::fmt::Display;
use std::path::Path;
use std::process::ExitCode;

/// Print `err` to stderr and exit non-zero, matching `lex-cli`'s
/// `unwrap_or_else(|e| { eprintln!(...); std::process::exit(1) })` idiom.
pub fn die(err: impl Display) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::FAILURE
}

/// Load the embedded defaults, layering an optional `--config` file on top.
pub fn load_config(config_path: Option<&Path>) -> Result<weft_config::WeftConfig, String> {
    let loader = match config_path {
        Some(path) => weft_config::Loader::new().with_file(path),
        None => weft_config::Loader::new(),
    };
    loader.build().map_err(|e| e.to_string())
}
